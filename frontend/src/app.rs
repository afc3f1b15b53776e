use yew::{html, Component, Context, Html};

use crate::api::auth;
use crate::components::dictionary::DictionaryComponent;
use crate::components::ficha::FichaEditor;
use crate::components::fichas_list::FichasListComponent;
use crate::components::form_builder::FormBuilder;
use crate::components::forms_list::FormsListComponent;
use crate::config::default_form_id;

/// Page selected by the query string.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    List,
    Editor { ficha_id: i64, form_id: i64 },
    Dictionary,
    Forms,
    Builder { form_id: i64 },
}

impl Route {
    /// `?ficha=<id>[&form=<id>]` opens the editor and `?builder=<id>` the form
    /// builder. `?view=diccionario` and `?view=formularios` pick the other
    /// pages; anything else shows the list.
    pub fn from_query(search: &str) -> Route {
        let mut ficha_id = None;
        let mut form_id = None;
        let mut view = None;
        let mut builder = None;
        for pair in search.trim_start_matches('?').split('&') {
            match pair.split_once('=') {
                Some(("ficha", v)) => ficha_id = v.parse::<i64>().ok(),
                Some(("form", v)) => form_id = v.parse::<i64>().ok(),
                Some(("view", v)) => view = Some(v.to_string()),
                Some(("builder", v)) => builder = v.parse::<i64>().ok(),
                _ => {}
            }
        }
        match (ficha_id, builder, view.as_deref()) {
            (Some(ficha_id), _, _) => Route::Editor {
                ficha_id,
                form_id: form_id.unwrap_or_else(default_form_id),
            },
            (None, Some(form_id), _) => Route::Builder { form_id },
            (None, None, Some("diccionario")) => Route::Dictionary,
            (None, None, Some("formularios")) => Route::Forms,
            _ => Route::List,
        }
    }

    fn current() -> Route {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        Route::from_query(&search)
    }
}

pub struct App {
    route: Route,
}

impl Component for App {
    type Message = ();
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            route: Route::current(),
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        let user = auth::current_user().map(|u| u.name).unwrap_or_default();
        html! {
            <div class="app-root">
                <nav class="app-nav">
                    <a href="?">{"Fichas Familiares"}</a>
                    <a href="?view=formularios">{"Formularios"}</a>
                    <a href="?view=diccionario">{"Diccionario ISO 8000"}</a>
                    <span class="app-user">{ user }</span>
                </nav>
                {
                    match &self.route {
                        Route::List => html! { <FichasListComponent /> },
                        Route::Dictionary => html! { <DictionaryComponent /> },
                        Route::Forms => html! { <FormsListComponent /> },
                        Route::Builder { form_id } => html! { <FormBuilder form_id={*form_id} /> },
                        Route::Editor { ficha_id, form_id } => html! {
                            <FichaEditor ficha_id={*ficha_id} form_id={*form_id} />
                        },
                    }
                }
            </div>
        }
    }
}
