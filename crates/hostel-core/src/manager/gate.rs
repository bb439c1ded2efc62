use crate::models::RecordId;

/// Yes/no guard in front of a destructive delete.
///
/// Only one target can be pending. Requesting another while the gate is
/// open replaces the earlier target.
#[derive(Debug, Default)]
pub struct ConfirmationGate {
    open: bool,
    target: Option<RecordId>,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, id: Option<RecordId>) {
        self.target = id;
        self.open = true;
    }

    /// Close the gate, handing back whatever target was pending.
    pub fn take(&mut self) -> Option<RecordId> {
        self.open = false;
        self.target.take()
    }

    pub fn cancel(&mut self) {
        self.open = false;
        self.target = None;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn target(&self) -> Option<&RecordId> {
        self.target.as_ref()
    }
}
