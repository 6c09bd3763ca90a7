/// Notification kinds emitted by the engine components.
pub mod kind {
    pub const ROTATION: &str = "rotation";
    pub const OVERLAY: &str = "overlay";
    pub const PROGRESS: &str = "progress";
    pub const TRACK_SAVED: &str = "track-saved";
}

/// One-shot structured notification.
///
/// This is just structured text for now; hosts match on `kind` and parse the
/// message where they need the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct NoticeBus {
    notices: Vec<Notice>,
}

impl NoticeBus {
    pub fn new() -> Self {
        Self {
            notices: Vec::new(),
        }
    }

    pub fn emit(&mut self, kind: &'static str, message: impl Into<String>) {
        self.notices.push(Notice {
            kind,
            message: message.into(),
        });
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
