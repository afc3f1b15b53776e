use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct FormBuilderProps {
    pub form_id: i64,
}
