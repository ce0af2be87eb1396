use yew::prelude::*;

use crate::utils::Modal;

#[derive(Properties, PartialEq)]
pub(crate) struct HelpProps {
    pub title: AttrValue,
    pub rules: &'static [&'static str],
    /// YouTube video id of a tutorial.
    #[prop_or_default]
    pub video: Option<&'static str>,
}

/// Floating "?" button that opens the rules of the current game.
#[function_component]
pub(crate) fn HelpPanel(props: &HelpProps) -> Html {
    let open = use_state(|| false);
    let cb_open = {
        let open = open.clone();
        Callback::from(move |_: MouseEvent| open.set(true))
    };
    let cb_close = {
        let open = open.clone();
        Callback::from(move |_: MouseEvent| open.set(false))
    };

    html! {
        <>
            <button class="help-button" title="Rules" onclick={cb_open}>{"?"}</button>
            if *open {
                <Modal>
                    <dialog class="help" open={true}>
                        <article>
                            <h2>{props.title.clone()}</h2>
                            <h3>{"How to play"}</h3>
                            <ol>
                                { for props.rules.iter().map(|rule| html! { <li>{*rule}</li> }) }
                            </ol>
                            if let Some(video) = props.video {
                                <p>
                                    <a href={format!("https://www.youtube.com/watch?v={video}")} target="_blank" rel="noopener">
                                        {"Video tutorial"}
                                    </a>
                                </p>
                            }
                            <footer>
                                <button onclick={cb_close}>{"Close"}</button>
                            </footer>
                        </article>
                    </dialog>
                </Modal>
            }
        </>
    }
}
