//! Session state machine.
//!
//! `transition` is pure: it returns the next state plus the effects the
//! orchestrator must run. Effects that suspend (model load, classification)
//! report back as events.

use crate::classification::ClassificationResult;
use crate::classifier::ClassifierError;
use crate::intake::{ImageFile, PreviewId};

pub const OFFLINE_MESSAGE: &str =
    "AI System Offline. Check your connection to load the neural network.";
pub const ANALYSIS_FAILED_MESSAGE: &str = "Analysis failed. Try another angle or lighting.";

/// Identifies one classification call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    LoadingModel,
    /// Model failed to load. Terminal until the session is restarted.
    Offline { message: &'static str },
    Ready(Analysis),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    AwaitingInput,
    Analyzing {
        preview: PreviewId,
        request: RequestId,
    },
    Classified {
        preview: PreviewId,
        result: ClassificationResult,
    },
    Failed {
        preview: PreviewId,
        message: &'static str,
    },
}

impl Analysis {
    pub fn preview(&self) -> Option<PreviewId> {
        match self {
            Analysis::AwaitingInput => None,
            Analysis::Analyzing { preview, .. }
            | Analysis::Classified { preview, .. }
            | Analysis::Failed { preview, .. } => Some(*preview),
        }
    }
}

impl Session {
    /// True when a new file selection would be accepted.
    pub fn accepts_input(&self) -> bool {
        matches!(self, Session::Ready(a) if !matches!(a, Analysis::Analyzing { .. }))
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, Session::Ready(Analysis::Analyzing { .. }))
    }

    pub fn preview(&self) -> Option<PreviewId> {
        match self {
            Session::Ready(a) => a.preview(),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        match self {
            Session::Ready(Analysis::Classified { result, .. }) => Some(result),
            _ => None,
        }
    }

    /// User-facing error, if any.
    pub fn error(&self) -> Option<&'static str> {
        match self {
            Session::Offline { message } | Session::Ready(Analysis::Failed { message, .. }) => {
                Some(*message)
            }
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum Event {
    ModelLoaded(Result<(), ClassifierError>),
    FileSelected {
        file: ImageFile,
        preview: PreviewId,
        request: RequestId,
    },
    ClassificationDone {
        request: RequestId,
        result: Result<ClassificationResult, ClassifierError>,
    },
}

#[derive(Debug, Clone)]
pub enum Effect {
    LoadModel,
    /// Decode the preview thumbnail, then classify `file`.
    Classify {
        request: RequestId,
        preview: PreviewId,
        file: ImageFile,
    },
    RevokePreview(PreviewId),
}

pub fn init() -> (Session, Vec<Effect>) {
    (Session::LoadingModel, vec![Effect::LoadModel])
}

pub fn transition(session: Session, event: Event) -> (Session, Vec<Effect>) {
    match (session, event) {
        (Session::LoadingModel, Event::ModelLoaded(Ok(()))) => {
            (Session::Ready(Analysis::AwaitingInput), vec![])
        }
        (Session::LoadingModel, Event::ModelLoaded(Err(e))) => {
            tracing::warn!("Model failed to load: {e}");
            (
                Session::Offline {
                    message: OFFLINE_MESSAGE,
                },
                vec![],
            )
        }

        (
            Session::Ready(analysis),
            Event::FileSelected {
                file,
                preview,
                request,
            },
        ) if !matches!(analysis, Analysis::Analyzing { .. }) => {
            let mut effects = Vec::with_capacity(2);
            if let Some(old) = analysis.preview() {
                effects.push(Effect::RevokePreview(old));
            }
            effects.push(Effect::Classify {
                request,
                preview,
                file,
            });
            (
                Session::Ready(Analysis::Analyzing { preview, request }),
                effects,
            )
        }
        // Not ready, or a request is already in flight: drop the selection.
        (session, Event::FileSelected { file, preview, .. }) => {
            tracing::debug!("Ignoring selection of {} while busy", file.name);
            (session, vec![Effect::RevokePreview(preview)])
        }

        (
            Session::Ready(Analysis::Analyzing { preview, request }),
            Event::ClassificationDone {
                request: done,
                result,
            },
        ) if request == done => match result {
            Ok(result) => (
                Session::Ready(Analysis::Classified { preview, result }),
                vec![],
            ),
            Err(e) => {
                tracing::error!("Classification failed: {e}");
                (
                    Session::Ready(Analysis::Failed {
                        preview,
                        message: ANALYSIS_FAILED_MESSAGE,
                    }),
                    vec![],
                )
            }
        },

        (session, event) => {
            tracing::debug!("Ignoring {event:?} in {session:?}");
            (session, vec![])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::WasteCategory;

    // Preview ids are opaque outside the intake module; mint them from a store.
    fn previews(n: usize) -> Vec<PreviewId> {
        let mut store = crate::intake::PreviewStore::new(8);
        (0..n)
            .map(|i| store.create(&file(&format!("{i}.png"))))
            .collect()
    }

    fn file(name: &str) -> ImageFile {
        ImageFile::from_bytes(name, vec![0u8; 4])
    }

    fn result() -> ClassificationResult {
        ClassificationResult {
            category: WasteCategory::Paper,
            confidence: 0.8,
            label: "envelope".into(),
            disposal_instructions: "Recycle.".into(),
            reasoning: "Paper.".into(),
        }
    }

    fn select(preview: PreviewId, request: u64) -> Event {
        Event::FileSelected {
            file: file("item.png"),
            preview,
            request: RequestId(request),
        }
    }

    fn ready() -> Session {
        let (session, _) = init();
        transition(session, Event::ModelLoaded(Ok(()))).0
    }

    #[test]
    fn init_loads_model() {
        let (session, effects) = init();
        assert_eq!(session, Session::LoadingModel);
        assert!(matches!(effects.as_slice(), [Effect::LoadModel]));
        assert!(!session.accepts_input());
    }

    #[test]
    fn load_failure_goes_offline() {
        let (session, effects) = transition(
            Session::LoadingModel,
            Event::ModelLoaded(Err(ClassifierError::NotLoaded)),
        );
        assert_eq!(
            session,
            Session::Offline {
                message: OFFLINE_MESSAGE
            }
        );
        assert!(effects.is_empty());
        assert_eq!(session.error(), Some(OFFLINE_MESSAGE));
    }

    #[test]
    fn selection_while_loading_is_dropped() {
        let p = previews(1);
        let (session, effects) = transition(Session::LoadingModel, select(p[0], 1));
        assert_eq!(session, Session::LoadingModel);
        assert!(matches!(effects.as_slice(), [Effect::RevokePreview(id)] if *id == p[0]));
    }

    #[test]
    fn offline_is_terminal() {
        let p = previews(1);
        let offline = Session::Offline {
            message: OFFLINE_MESSAGE,
        };
        let (session, _) = transition(offline.clone(), Event::ModelLoaded(Ok(())));
        assert_eq!(session, offline);
        let (session, _) = transition(session, select(p[0], 1));
        assert_eq!(session, offline);
        assert!(session.preview().is_none());
    }

    #[test]
    fn accepted_selection_starts_analysis() {
        let p = previews(1);
        let (session, effects) = transition(ready(), select(p[0], 7));
        assert!(session.is_processing());
        assert_eq!(session.preview(), Some(p[0]));
        assert!(session.result().is_none());
        assert!(matches!(
            effects.as_slice(),
            [Effect::Classify { request: RequestId(7), preview, .. }] if *preview == p[0]
        ));
    }

    #[test]
    fn selection_during_analysis_is_dropped() {
        let p = previews(2);
        let (busy, _) = transition(ready(), select(p[0], 1));
        let (session, effects) = transition(busy.clone(), select(p[1], 2));
        assert_eq!(session, busy);
        assert!(matches!(effects.as_slice(), [Effect::RevokePreview(id)] if *id == p[1]));
    }

    #[test]
    fn completion_stores_result_verbatim() {
        let p = previews(1);
        let (busy, _) = transition(ready(), select(p[0], 1));
        let (session, effects) = transition(
            busy,
            Event::ClassificationDone {
                request: RequestId(1),
                result: Ok(result()),
            },
        );
        assert!(effects.is_empty());
        assert!(!session.is_processing());
        assert_eq!(session.result(), Some(&result()));
        assert_eq!(session.preview(), Some(p[0]));
    }

    #[test]
    fn failure_keeps_preview_and_sets_message() {
        let p = previews(1);
        let (busy, _) = transition(ready(), select(p[0], 1));
        let (session, _) = transition(
            busy,
            Event::ClassificationDone {
                request: RequestId(1),
                result: Err(ClassifierError::Inference("boom".into())),
            },
        );
        assert!(!session.is_processing());
        assert!(session.result().is_none());
        assert_eq!(session.error(), Some(ANALYSIS_FAILED_MESSAGE));
        assert_eq!(session.preview(), Some(p[0]));
        assert!(session.accepts_input());
    }

    #[test]
    fn stale_completion_is_ignored() {
        let p = previews(1);
        let (busy, _) = transition(ready(), select(p[0], 2));
        let (session, _) = transition(
            busy.clone(),
            Event::ClassificationDone {
                request: RequestId(1),
                result: Ok(result()),
            },
        );
        assert_eq!(session, busy);
    }

    #[test]
    fn new_selection_revokes_previous_preview_and_result() {
        let p = previews(2);
        let (busy, _) = transition(ready(), select(p[0], 1));
        let (done, _) = transition(
            busy,
            Event::ClassificationDone {
                request: RequestId(1),
                result: Ok(result()),
            },
        );
        let (session, effects) = transition(done, select(p[1], 2));
        assert!(session.result().is_none());
        assert_eq!(session.preview(), Some(p[1]));
        assert!(matches!(
            effects.as_slice(),
            [Effect::RevokePreview(old), Effect::Classify { .. }] if *old == p[0]
        ));
    }
}
