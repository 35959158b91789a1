/// Side effects declared by the reducer, executed as spawned tasks.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadPage { offset: u32 },
    LoadTypeEntries { type_name: String },
    LookupEntry { query: String },
    ComposeDetail { id: u32 },
    PlayCry { url: String },
}
