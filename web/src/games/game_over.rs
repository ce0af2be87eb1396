use yew::prelude::*;

use crate::utils::Modal;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    const fn default_title(self) -> &'static str {
        match self {
            Self::Won => "VICTORY!",
            Self::Lost => "GAME OVER",
        }
    }

    const fn default_message(self) -> &'static str {
        match self {
            Self::Won => "Great performance! You mastered the challenge.",
            Self::Lost => "Not this time. Try again to win!",
        }
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct GameOverProps {
    pub outcome: Outcome,
    pub on_restart: Callback<MouseEvent>,
    #[prop_or_default]
    pub title: Option<AttrValue>,
    #[prop_or_default]
    pub message: Option<AttrValue>,
    /// Shown as the level just unlocked.
    #[prop_or_default]
    pub level: Option<u32>,
    #[prop_or_default]
    pub restart_label: Option<AttrValue>,
}

#[function_component]
pub(crate) fn GameOverModal(props: &GameOverProps) -> Html {
    let outcome = props.outcome;
    let title = props
        .title
        .clone()
        .unwrap_or_else(|| outcome.default_title().into());
    let message = props
        .message
        .clone()
        .unwrap_or_else(|| outcome.default_message().into());
    let restart_label = props
        .restart_label
        .clone()
        .unwrap_or_else(|| "PLAY AGAIN".into());
    let class = classes!(
        "game-over",
        match outcome {
            Outcome::Won => "won",
            Outcome::Lost => "lost",
        }
    );

    html! {
        <Modal>
            <dialog {class} open={true}>
                <article>
                    <div class="emoji">{ if outcome == Outcome::Won { "😃" } else { "😢" } }</div>
                    <h2>{title}</h2>
                    <p>{message}</p>
                    if let Some(level) = props.level {
                        <p class="level">{format!("New level: LV {level}")}</p>
                    }
                    <footer>
                        <button onclick={props.on_restart.clone()}>{restart_label}</button>
                        <a href="#/">{"Main menu"}</a>
                    </footer>
                </article>
            </dialog>
        </Modal>
    }
}
