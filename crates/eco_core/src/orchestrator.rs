//! Drives the session state machine.
//!
//! The orchestrator lives on the UI thread. Model loading, preview decoding
//! and classification run on worker threads and report back over a channel
//! that the UI drains with [`Orchestrator::pump`] once per frame.

use crate::classifier::{ClassifierError, WasteClassifier};
use crate::intake::{self, ImageFile, PreviewId, PreviewStore};
use crate::session::{self, Effect, Event, RequestId, Session};
use image::RgbaImage;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::time::{Duration, Instant};

/// Called from worker threads after an event is queued, so the UI can wake.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

enum Message {
    Session(Event),
    Thumbnail {
        preview: PreviewId,
        image: Option<RgbaImage>,
    },
}

/// Worker side of the channel.
#[derive(Clone)]
struct Outbox {
    sender: Sender<Message>,
    waker: Option<Waker>,
}

impl Outbox {
    fn send(&self, message: Message) {
        if self.sender.send(message).is_err() {
            tracing::debug!("Session closed before the result arrived");
            return;
        }
        if let Some(wake) = &self.waker {
            wake();
        }
    }
}

pub struct Orchestrator {
    session: Session,
    previews: PreviewStore,
    classifier: Arc<dyn WasteClassifier>,
    outbox: Outbox,
    inbox: Receiver<Message>,
    next_request: u64,
}

impl Orchestrator {
    /// Starts a session; the model load begins immediately.
    pub fn start(classifier: Arc<dyn WasteClassifier>, preview_size: u32) -> Self {
        Self::start_with_waker(classifier, preview_size, None)
    }

    pub fn start_with_waker(
        classifier: Arc<dyn WasteClassifier>,
        preview_size: u32,
        waker: Option<Waker>,
    ) -> Self {
        let (sender, inbox) = channel();
        let (session, effects) = session::init();
        let mut orchestrator = Self {
            session,
            previews: PreviewStore::new(preview_size),
            classifier,
            outbox: Outbox { sender, waker },
            inbox,
            next_request: 0,
        };
        orchestrator.run_effects(effects);
        orchestrator
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn previews(&self) -> &PreviewStore {
        &self.previews
    }

    /// Offers a file for classification. Returns false when the session is
    /// not accepting input; in that case nothing changes.
    pub fn select_file(&mut self, file: ImageFile) -> bool {
        if !self.session.accepts_input() {
            tracing::debug!("Selection of {} dropped: session not ready", file.name);
            return false;
        }
        let preview = self.previews.create(&file);
        self.next_request += 1;
        let request = RequestId(self.next_request);
        tracing::info!("Classifying {} ({:?})", file.name, request);
        self.apply(Event::FileSelected {
            file,
            preview,
            request,
        });
        true
    }

    /// Applies every completed message without blocking. Returns how many.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.inbox.try_recv() {
            self.handle(message);
            applied += 1;
        }
        applied
    }

    /// Blocks until one session event arrives or `timeout` passes.
    /// Thumbnails that arrive in the meantime are stored along the way.
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.inbox.recv_timeout(left) {
                Ok(Message::Session(event)) => {
                    self.apply(event);
                    return true;
                }
                Ok(thumbnail) => self.handle(thumbnail),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return false,
            }
        }
    }

    fn handle(&mut self, message: Message) {
        match message {
            Message::Session(event) => self.apply(event),
            Message::Thumbnail { preview, image } => {
                if !self.previews.attach(preview, image) {
                    tracing::debug!("Dropping thumbnail for revoked {preview:?}");
                }
            }
        }
    }

    fn apply(&mut self, event: Event) {
        let current = std::mem::replace(&mut self.session, Session::LoadingModel);
        let (next, effects) = session::transition(current, event);
        tracing::debug!("session now {:?}, effects {:?}", next, effects);
        self.session = next;
        self.run_effects(effects);
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RevokePreview(id) => {
                    self.previews.revoke(id);
                }
                Effect::LoadModel => self.spawn(
                    |classifier, _| Event::ModelLoaded(classifier.load_model()),
                    |e| Event::ModelLoaded(Err(e)),
                ),
                Effect::Classify {
                    request,
                    preview,
                    file,
                } => {
                    let max_side = self.previews.max_side();
                    self.spawn(
                        move |classifier, outbox| {
                            let image = intake::decode_thumbnail(&file, max_side);
                            outbox.send(Message::Thumbnail { preview, image });
                            Event::ClassificationDone {
                                request,
                                result: classifier.classify(&file),
                            }
                        },
                        move |e| Event::ClassificationDone {
                            request,
                            result: Err(e),
                        },
                    );
                }
            }
        }
    }

    /// Runs `job` on a worker thread. A panicking job still reports back,
    /// through `on_panic`, so the session never waits forever.
    fn spawn<F, P>(&self, job: F, on_panic: P)
    where
        F: FnOnce(&dyn WasteClassifier, &Outbox) -> Event + Send + 'static,
        P: FnOnce(ClassifierError) -> Event + Send + 'static,
    {
        let classifier = Arc::clone(&self.classifier);
        let outbox = self.outbox.clone();
        std::thread::spawn(move || {
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| job(classifier.as_ref(), &outbox)));
            let event = match outcome {
                Ok(event) => event,
                Err(payload) => {
                    let reason = panic_reason(payload.as_ref());
                    tracing::error!("Classifier worker panicked: {reason}");
                    on_panic(ClassifierError::Panicked(reason))
                }
            };
            outbox.send(Message::Session(event));
        });
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
