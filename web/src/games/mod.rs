use yew::prelude::*;

mod arena;
pub(crate) mod checkers;
pub(crate) mod chess;
pub(crate) mod football;
mod game_over;
mod help;
pub(crate) mod jigsaw;
pub(crate) mod ludo;
pub(crate) mod maze;
pub(crate) mod racing;
pub(crate) mod slots;
pub(crate) mod sliding;
pub(crate) mod uno;

pub(crate) use game_over::{GameOverModal, Outcome};
pub(crate) use help::HelpPanel;

/// Props every game view is mounted with.
#[derive(Properties, Clone, PartialEq)]
pub(crate) struct GameProps {
    #[prop_or_default]
    pub muted: bool,
    /// Fixed seed for reproducible deals and layouts.
    #[prop_or_default]
    pub seed: Option<u64>,
}

#[derive(Properties, PartialEq)]
pub(crate) struct ToolbarProps {
    pub title: AttrValue,
    #[prop_or_default]
    pub on_restart: Option<Callback<MouseEvent>>,
    #[prop_or_default]
    pub children: Html,
}

/// Header row shared by the game views: back link, title, restart button.
#[function_component]
pub(crate) fn Toolbar(props: &ToolbarProps) -> Html {
    html! {
        <header class="toolbar">
            <a href="#/">{"← Menu"}</a>
            <h2>{props.title.clone()}</h2>
            { props.children.clone() }
            if let Some(on_restart) = props.on_restart.clone() {
                <button class="restart" title="Restart" onclick={on_restart}>{"↺"}</button>
            }
        </header>
    }
}
