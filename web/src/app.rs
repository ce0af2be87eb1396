use gloo::events::EventListener;
use gloo::utils::window;
use yew::prelude::*;

use crate::games::*;
use crate::utils::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Route {
    Home,
    Checkers,
    Chess,
    Sliding,
    Jigsaw,
    Uno,
    Ludo,
    Maze,
    Slots,
    Racing,
    Football,
}

impl Route {
    pub(crate) const GAMES: [Route; 10] = [
        Self::Checkers,
        Self::Chess,
        Self::Sliding,
        Self::Jigsaw,
        Self::Uno,
        Self::Ludo,
        Self::Maze,
        Self::Slots,
        Self::Racing,
        Self::Football,
    ];

    pub(crate) const fn path(self) -> &'static str {
        use Route::*;
        match self {
            Home => "/",
            Checkers => "/checkers",
            Chess => "/chess",
            Sliding => "/sliding",
            Jigsaw => "/jigsaw",
            Uno => "/uno",
            Ludo => "/ludo",
            Maze => "/maze",
            Slots => "/slots",
            Racing => "/racing",
            Football => "/football",
        }
    }

    pub(crate) const fn title(self) -> &'static str {
        use Route::*;
        match self {
            Home => "MultiGame",
            Checkers => "Checkers",
            Chess => "Chess",
            Sliding => "8-Puzzle",
            Jigsaw => "Picture Puzzle",
            Uno => "Uno",
            Ludo => "Ludo Race",
            Maze => "Maze",
            Slots => "Nations Slots",
            Racing => "Car Racing",
            Football => "Football",
        }
    }

    const fn blurb(self) -> &'static str {
        use Route::*;
        match self {
            Home => "",
            Checkers => "Classic draughts for two on one screen.",
            Chess => "Move the pieces, take the king.",
            Sliding => "Put the eight tiles back in order.",
            Jigsaw => "Slide the picture back together, level by level.",
            Uno => "Match colours and numbers against a friend.",
            Ludo => "Roll the die and race to square thirty.",
            Maze => "Find the way out with the arrow keys.",
            Slots => "Spin the flags and chase the big payout.",
            Racing => "Dodge the traffic and earn coins for new cars.",
            Football => "Five-a-side against the computer or a friend.",
        }
    }

    pub(crate) fn href(self) -> String {
        format!("#{}", self.path())
    }

    /// Unknown paths land on the home page.
    pub(crate) fn from_hash(hash: &str) -> Self {
        let path = hash
            .split(['#', '&'])
            .find(|part| part.starts_with('/'))
            .unwrap_or("/");
        Self::GAMES
            .into_iter()
            .find(|route| route.path() == path)
            .unwrap_or(Self::Home)
    }
}

fn current_route() -> Route {
    Route::from_hash(&window().location().hash().unwrap_or_default())
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct AppProps {
    #[prop_or_default]
    pub seed: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Navigate(Route),
    ToggleMute,
}

pub(crate) struct App {
    route: Route,
    muted: Muted,
    _hash_listener: EventListener,
}

impl App {
    fn game_view(&self, seed: Option<u64>) -> Html {
        let muted = self.muted.0;
        match self.route {
            Route::Home => Self::landing(),
            Route::Checkers => html! { <checkers::CheckersView {muted} {seed}/> },
            Route::Chess => html! { <chess::ChessView {muted} {seed}/> },
            Route::Sliding => html! { <sliding::SlidingView {muted} {seed}/> },
            Route::Jigsaw => html! { <jigsaw::JigsawView {muted} {seed}/> },
            Route::Uno => html! { <uno::UnoView {muted} {seed}/> },
            Route::Ludo => html! { <ludo::LudoView {muted} {seed}/> },
            Route::Maze => html! { <maze::MazeView {muted} {seed}/> },
            Route::Slots => html! { <slots::SlotsView {muted} {seed}/> },
            Route::Racing => html! { <racing::RacingView {muted} {seed}/> },
            Route::Football => html! { <football::FootballView {muted} {seed}/> },
        }
    }

    fn landing() -> Html {
        html! {
            <section class="landing">
                <h1>{"Pick a game"}</h1>
                <ul>
                    {
                        for Route::GAMES.into_iter().map(|route| html! {
                            <li>
                                <a href={route.href()}>
                                    <strong>{route.title()}</strong>
                                    <small>{route.blurb()}</small>
                                </a>
                            </li>
                        })
                    }
                </ul>
            </section>
        }
    }
}

impl Component for App {
    type Message = Msg;
    type Properties = AppProps;

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        let hash_listener = EventListener::new(&window(), "hashchange", move |_| {
            link.send_message(Msg::Navigate(current_route()));
        });
        Self {
            route: current_route(),
            muted: LocalOrDefault::local_or_default(),
            _hash_listener: hash_listener,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Navigate(route) => {
                log::debug!("navigate: {:?}", route);
                if self.route != route {
                    self.route = route;
                    window().scroll_to_with_x_and_y(0.0, 0.0);
                    true
                } else {
                    false
                }
            }
            ToggleMute => {
                self.muted = Muted(!self.muted.0);
                self.muted.local_save();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let cb_toggle_mute = ctx.link().callback(|_: MouseEvent| Msg::ToggleMute);
        let mute_label = if self.muted.0 { "🔇" } else { "🔊" };

        html! {
            <div class="multigame">
                <nav>
                    <a class="brand" href={Route::Home.href()}>{"MULTIGAME"}</a>
                    <span>{self.route.title()}</span>
                    <button class="mute" title="Toggle sound" onclick={cb_toggle_mute}>{mute_label}</button>
                </nav>
                <main>
                    { self.game_view(ctx.props().seed) }
                </main>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_is_found_next_to_flags() {
        assert_eq!(Route::from_hash("#/uno"), Route::Uno);
        assert_eq!(Route::from_hash("#-v&/maze&--seed=3"), Route::Maze);
        assert_eq!(Route::from_hash(""), Route::Home);
        assert_eq!(Route::from_hash("#/nope"), Route::Home);
    }

    #[test]
    fn every_game_round_trips_through_its_href() {
        for route in Route::GAMES {
            assert_eq!(Route::from_hash(&route.href()), route);
        }
    }
}
