use clap::ValueEnum;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum FormatFlag {
    Table,
    Markdown,
    Json,
}

impl FormatFlag {
    pub(crate) const fn is_json(self) -> bool {
        matches!(self, FormatFlag::Json)
    }
}
