use serde::{Deserialize, Serialize};

use crate::state::{EntryBundle, EntryRef};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,

    PageDidLoad { offset: u32, entries: Vec<EntryRef> },
    PageDidError(String),
    PageNext,
    PagePrev,

    TypeTabNext,
    TypeTabPrev,
    TypeEntriesDidLoad { type_name: String, entries: Vec<EntryRef> },
    TypeEntriesDidError { type_name: String, error: String },

    SearchStart,
    SearchInput(char),
    SearchBackspace,
    SearchCancel,
    SearchSubmit,
    SearchClear,
    SearchDidLoad(Vec<EntryRef>),
    SearchDidNoMatch,
    SearchDidError(String),

    SelectionMove(i16),

    InspectOpen,
    InspectClose,
    DetailDidLoad { id: u32, bundle: EntryBundle },
    DetailDidError { id: u32, error: String },

    PlayCry,
    CryDidError(String),

    #[action(category = "ui")]
    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
