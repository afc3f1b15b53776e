use common::model::ficha::{FichaStatus, FichaSummary};

pub enum Msg {
    Reload,
    Loaded(Vec<FichaSummary>),
    LoadFailed,
    ToggleRow(i64, bool),
    ToggleAll(bool),
    ApplyStatus(FichaStatus),
    StatusApplied,
    StatusFailed,
}
