use eco_core::{
    ANALYSIS_FAILED_MESSAGE, ClassificationResult, ClassifierError, DemoClassifier, ImageFile,
    OFFLINE_MESSAGE, Orchestrator, ReportView, Session, WasteCategory, WasteClassifier,
    report_view,
};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

type Outcome = Result<ClassificationResult, ClassifierError>;

/// Classifier whose `classify` calls block until the test releases an outcome.
struct Scripted {
    load_ok: bool,
    outcomes: Mutex<Receiver<Outcome>>,
    calls: AtomicUsize,
}

impl WasteClassifier for Scripted {
    fn load_model(&self) -> Result<(), ClassifierError> {
        if self.load_ok {
            Ok(())
        } else {
            Err(ClassifierError::ModelMissing("models/missing.onnx".into()))
        }
    }

    fn classify(&self, _image: &ImageFile) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .unwrap()
            .recv()
            .unwrap_or(Err(ClassifierError::NotLoaded))
    }
}

struct Fixture {
    classifier: Arc<Scripted>,
    release: Sender<Outcome>,
    orchestrator: Orchestrator,
}

impl Fixture {
    fn new(load_ok: bool) -> Self {
        let (release, outcomes) = channel();
        let classifier = Arc::new(Scripted {
            load_ok,
            outcomes: Mutex::new(outcomes),
            calls: AtomicUsize::new(0),
        });
        let orchestrator = Orchestrator::start(classifier.clone(), 64);
        Self {
            classifier,
            release,
            orchestrator,
        }
    }

    fn ready(load_ok: bool) -> Self {
        let mut f = Self::new(load_ok);
        assert!(f.orchestrator.wait_for_event(WAIT), "model load never reported");
        f
    }

    fn finish(&mut self, outcome: Outcome) {
        self.release.send(outcome).unwrap();
        assert!(self.orchestrator.wait_for_event(WAIT), "classification never reported");
    }
}

fn png(name: &str) -> ImageFile {
    let img = RgbaImage::from_pixel(8, 8, Rgba([120, 80, 40, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    ImageFile::from_bytes(name, out.into_inner())
}

fn expected() -> ClassificationResult {
    ClassificationResult {
        category: WasteCategory::Plastic,
        confidence: 0.8312,
        label: "water bottle".into(),
        disposal_instructions: "Rinse and recycle with plastics.".into(),
        reasoning: "Clear PET bottle shape.".into(),
    }
}

#[test]
fn selection_before_model_is_ready_changes_nothing() {
    let mut f = Fixture::new(true);
    assert_eq!(f.orchestrator.session(), &Session::LoadingModel);

    assert!(!f.orchestrator.select_file(png("early.png")));
    assert_eq!(f.orchestrator.session(), &Session::LoadingModel);
    assert_eq!(f.orchestrator.previews().live_count(), 0);
    assert!(!f.orchestrator.session().is_processing());
    assert!(f.orchestrator.session().result().is_none());
}

#[test]
fn successful_classification_stores_result_unchanged() {
    let mut f = Fixture::ready(true);

    assert!(f.orchestrator.select_file(png("bottle.png")));
    let preview = f.orchestrator.session().preview().expect("preview shown");
    assert!(f.orchestrator.session().is_processing());
    assert!(f.orchestrator.previews().is_live(preview));
    assert_eq!(
        report_view(f.orchestrator.session()),
        ReportView::Analyzing { preview }
    );

    f.finish(Ok(expected()));

    let session = f.orchestrator.session();
    assert!(!session.is_processing());
    assert_eq!(session.result(), Some(&expected()));
    assert_eq!(session.preview(), Some(preview));
    assert!(session.error().is_none());
    assert_eq!(f.classifier.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn failed_classification_sets_fixed_message() {
    let mut f = Fixture::ready(true);
    assert!(f.orchestrator.select_file(png("blurry.png")));
    assert!(f.orchestrator.session().is_processing());

    f.finish(Err(ClassifierError::Inference("tensor shape mismatch".into())));

    let session = f.orchestrator.session();
    assert!(!session.is_processing());
    assert_eq!(session.error(), Some(ANALYSIS_FAILED_MESSAGE));
    assert!(session.result().is_none());
    // the failed attempt's preview stays visible
    let preview = session.preview().expect("preview kept");
    assert_eq!(report_view(session), ReportView::PreviewOnly { preview });

    // still usable
    assert!(f.orchestrator.select_file(png("retry.png")));
    f.finish(Ok(expected()));
    assert_eq!(f.orchestrator.session().result(), Some(&expected()));
}

#[test]
fn second_selection_clears_previous_result_and_preview() {
    let mut f = Fixture::ready(true);
    assert!(f.orchestrator.select_file(png("first.png")));
    let first = f.orchestrator.session().preview().unwrap();
    f.finish(Ok(expected()));
    assert!(f.orchestrator.session().result().is_some());

    assert!(f.orchestrator.select_file(png("second.png")));
    let second = f.orchestrator.session().preview().unwrap();
    assert_ne!(first, second);
    assert!(f.orchestrator.session().result().is_none());
    assert!(!f.orchestrator.previews().is_live(first));
    assert!(f.orchestrator.previews().is_live(second));
    assert_eq!(f.orchestrator.previews().live_count(), 1);

    f.finish(Ok(expected()));
}

#[test]
fn selection_while_analyzing_is_ignored() {
    let mut f = Fixture::ready(true);
    assert!(f.orchestrator.select_file(png("first.png")));
    let first = f.orchestrator.session().preview().unwrap();

    assert!(!f.orchestrator.select_file(png("impatient.png")));
    assert_eq!(f.orchestrator.session().preview(), Some(first));
    assert_eq!(f.orchestrator.previews().live_count(), 1);

    f.finish(Ok(expected()));
    assert_eq!(f.classifier.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn load_failure_blocks_classification_until_restart() {
    let mut f = Fixture::ready(false);
    assert_eq!(
        f.orchestrator.session(),
        &Session::Offline {
            message: OFFLINE_MESSAGE
        }
    );

    for name in ["a.png", "b.png", "c.png"] {
        assert!(!f.orchestrator.select_file(png(name)));
    }
    assert_eq!(f.orchestrator.previews().live_count(), 0);
    assert_eq!(f.classifier.calls.load(Ordering::SeqCst), 0);
    assert!(!f.orchestrator.wait_for_event(Duration::from_millis(50)));

    // restarting the session reruns the load from scratch
    let mut restarted = Fixture::ready(true);
    assert!(restarted.orchestrator.select_file(png("a.png")));
    restarted.finish(Ok(expected()));
}

#[test]
fn waker_fires_when_work_completes() {
    let woken = Arc::new(AtomicUsize::new(0));
    let counter = woken.clone();
    let classifier = Arc::new(DemoClassifier::new(Duration::ZERO, 0.2));
    let mut orchestrator = Orchestrator::start_with_waker(
        classifier,
        64,
        Some(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })),
    );
    assert!(orchestrator.wait_for_event(WAIT));
    assert!(orchestrator.select_file(png("banana.png")));
    assert!(orchestrator.wait_for_event(WAIT));

    // the waker runs just after the event is queued
    let deadline = std::time::Instant::now() + WAIT;
    while woken.load(Ordering::SeqCst) < 2 {
        assert!(std::time::Instant::now() < deadline, "waker not called");
        std::thread::sleep(Duration::from_millis(5));
    }
    let result = orchestrator.session().result().expect("classified");
    assert_eq!(result.category, WasteCategory::Organic);
}

#[test]
fn pump_applies_queued_events_without_blocking() {
    let classifier = Arc::new(DemoClassifier::new(Duration::ZERO, 0.2));
    let mut orchestrator = Orchestrator::start(classifier, 64);

    let deadline = std::time::Instant::now() + WAIT;
    while orchestrator.session() == &Session::LoadingModel {
        assert!(std::time::Instant::now() < deadline, "model never loaded");
        orchestrator.pump();
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(orchestrator.session().accepts_input());
    assert_eq!(orchestrator.pump(), 0);
}

/// Classifier that panics in whichever call it is told to.
struct Panicking {
    on_load: bool,
}

impl WasteClassifier for Panicking {
    fn load_model(&self) -> Result<(), ClassifierError> {
        if self.on_load {
            panic!("failed to initialize ONNX Runtime environment");
        }
        Ok(())
    }

    fn classify(&self, _image: &ImageFile) -> Outcome {
        panic!("tensor buffer overrun");
    }
}

#[test]
fn panic_during_load_goes_offline() {
    let mut orchestrator = Orchestrator::start(Arc::new(Panicking { on_load: true }), 64);
    assert!(orchestrator.wait_for_event(WAIT), "load outcome never reported");
    assert_eq!(
        orchestrator.session(),
        &Session::Offline {
            message: OFFLINE_MESSAGE
        }
    );
    assert!(!orchestrator.select_file(png("bottle.png")));
}

#[test]
fn panic_during_classification_is_a_recoverable_failure() {
    let mut orchestrator = Orchestrator::start(Arc::new(Panicking { on_load: false }), 64);
    assert!(orchestrator.wait_for_event(WAIT));
    assert!(orchestrator.session().accepts_input());

    assert!(orchestrator.select_file(png("bottle.png")));
    assert!(orchestrator.wait_for_event(WAIT), "classification never reported");

    let session = orchestrator.session();
    assert!(!session.is_processing());
    assert_eq!(session.error(), Some(ANALYSIS_FAILED_MESSAGE));
    assert!(session.preview().is_some());
    assert!(session.accepts_input());
}

#[test]
fn thumbnail_arrives_while_analyzing() {
    let mut f = Fixture::ready(true);
    assert!(f.orchestrator.select_file(png("bottle.png")));
    let preview = f.orchestrator.session().preview().unwrap();

    let deadline = std::time::Instant::now() + WAIT;
    while f
        .orchestrator
        .previews()
        .get(preview)
        .is_some_and(|p| p.image.is_none())
    {
        assert!(std::time::Instant::now() < deadline, "thumbnail never arrived");
        f.orchestrator.pump();
        std::thread::sleep(Duration::from_millis(5));
    }
    // classify is still blocked on the scripted outcome
    assert!(f.orchestrator.session().is_processing());
    let thumb = f.orchestrator.previews().get(preview).unwrap();
    assert_eq!(thumb.image.as_ref().map(|i| i.dimensions()), Some((8, 8)));

    f.finish(Ok(expected()));
}
