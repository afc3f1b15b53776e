//! Properties of the [`FichaEditor`](super::FichaEditor).

use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct FichaEditorProps {
    /// Record to edit. Loaded once on first render.
    pub ficha_id: i64,

    /// Form whose schema describes the record.
    pub form_id: i64,
}
