//! Maps session state to what each panel should show.

use crate::classification::ClassificationResult;
use crate::intake::PreviewId;
use crate::session::{Analysis, Session};
use crate::style::{CategoryStyle, category_style};

/// Left-hand panel: model status and file intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeView {
    DeployingModel,
    Offline { message: &'static str },
    Dropzone {
        /// False while a classification is in flight.
        enabled: bool,
        /// Message from the last failed classification.
        notice: Option<&'static str>,
    },
}

/// Right-hand panel: preview and report.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportView<'a> {
    AwaitingInput,
    Analyzing {
        preview: PreviewId,
    },
    Report {
        preview: PreviewId,
        result: &'a ClassificationResult,
        style: CategoryStyle,
    },
    /// The last attempt failed; its preview stays up without a report.
    PreviewOnly {
        preview: PreviewId,
    },
}

pub fn intake_view(session: &Session) -> IntakeView {
    match session {
        Session::LoadingModel => IntakeView::DeployingModel,
        Session::Offline { message } => IntakeView::Offline { message: *message },
        Session::Ready(analysis) => IntakeView::Dropzone {
            enabled: !matches!(analysis, Analysis::Analyzing { .. }),
            notice: match analysis {
                Analysis::Failed { message, .. } => Some(*message),
                _ => None,
            },
        },
    }
}

pub fn report_view(session: &Session) -> ReportView<'_> {
    let Session::Ready(analysis) = session else {
        return ReportView::AwaitingInput;
    };
    match analysis {
        Analysis::AwaitingInput => ReportView::AwaitingInput,
        Analysis::Analyzing { preview, .. } => ReportView::Analyzing { preview: *preview },
        Analysis::Classified { preview, result } => ReportView::Report {
            preview: *preview,
            result,
            style: category_style(&result.category),
        },
        Analysis::Failed { preview, .. } => ReportView::PreviewOnly { preview: *preview },
    }
}
