//! Action enum: user intents and internal events.

use media_core::RecordId;

/// Unique identifier for a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    FileTable,
    Distributions,
    FileDetail,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Selection ────────────────────────────────────────────────────────────
    ToggleRecord(RecordId),
    ToggleAll,
    ClearSelection,

    // ── Navigation ───────────────────────────────────────────────────────────
    OpenDetail(RecordId),
    CloseDetail,

    // ── Deletion ─────────────────────────────────────────────────────────────
    DeleteSelected,
    /// Ask for confirmation before wiping the whole collection.
    RequestDeleteAll,
    ConfirmDeleteAll,
    CancelConfirm,
    DeleteRecord(RecordId),

    // ── System ───────────────────────────────────────────────────────────────
    Reload,
    /// The collection changed; components holding derived data resync.
    CollectionChanged,
    Quit,
    Resize(u16, u16),
}

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    List,
    Detail(RecordId),
}
