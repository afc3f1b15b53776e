use std::collections::BTreeSet;

use common::model::ficha::FichaSummary;

pub struct FichasListComponent {
    pub fichas: Vec<FichaSummary>,
    /// Ids of the checked rows.
    pub selected: BTreeSet<i64>,
    pub loading: bool,
    /// A bulk update is in flight; the toolbar is disabled.
    pub processing: bool,
}

impl FichasListComponent {
    pub fn new() -> Self {
        Self {
            fichas: Vec::new(),
            selected: BTreeSet::new(),
            loading: true,
            processing: false,
        }
    }

    pub fn all_selected(&self) -> bool {
        !self.fichas.is_empty() && self.selected.len() == self.fichas.len()
    }
}
