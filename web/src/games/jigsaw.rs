use multigame_core::jigsaw::{CATEGORIES, Jigsaw, Stage};
use multigame_core::sliding::{HOLE, SlideOutcome};
use rand::rngs::SmallRng;
use yew::prelude::*;

use super::*;
use crate::sound::{Sound, SoundBoard};
use crate::utils::game_rng;

const RULES: &[&str] = &[
    "Pick a theme and one of its five pictures.",
    "The pieces are shuffled but always solvable.",
    "Slide pieces next to the empty space to rebuild the picture.",
    "Winning unlocks bigger, harder grids.",
];

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Category(usize),
    Image(usize),
    Slide(usize),
    Back,
    NextLevel,
}

pub(crate) struct JigsawView {
    jigsaw: Jigsaw,
    rng: SmallRng,
    sound: SoundBoard,
}

impl JigsawView {
    fn tile_style(&self, tile: u8, url: &str) -> String {
        if tile == HOLE {
            return "background-image: none".to_owned();
        }
        let size = u32::from(self.jigsaw.grid_size()) * 100;
        let (x, y) = self.jigsaw.background_offset(tile);
        format!("background-image: url({url}); background-size: {size}%; background-position: {x}% {y}%")
    }

    fn view_categories(&self, ctx: &Context<Self>) -> Html {
        html! {
            <section class="categories">
                <h3>{"Choose a theme"}</h3>
                <div class="cards">
                    {
                        for CATEGORIES.iter().enumerate().map(|(index, category)| {
                            let onclick = ctx.link().callback(move |_: MouseEvent| Msg::Category(index));
                            html! {
                                <button class="card" {onclick}>
                                    <img src={category.images[0]} alt={category.name}/>
                                    <strong>{category.name}</strong>
                                    <small>{format!("{} pictures", category.images.len())}</small>
                                </button>
                            }
                        })
                    }
                </div>
            </section>
        }
    }

    fn view_images(&self, ctx: &Context<Self>, category: usize) -> Html {
        let Some(category) = CATEGORIES.get(category) else {
            return Html::default();
        };
        let cb_back = ctx.link().callback(|_: MouseEvent| Msg::Back);

        html! {
            <section class="images">
                <header>
                    <button onclick={cb_back}>{"← Back"}</button>
                    <h3>{category.name}</h3>
                </header>
                <div class="cards">
                    {
                        for category.images.iter().enumerate().map(|(index, url)| {
                            let onclick = ctx.link().callback(move |_: MouseEvent| Msg::Image(index));
                            html! {
                                <button class="card" {onclick}><img src={*url} alt="Picture"/></button>
                            }
                        })
                    }
                </div>
            </section>
        }
    }

    fn view_board(&self, ctx: &Context<Self>, url: &str) -> Html {
        let size = self.jigsaw.grid_size();
        let style = format!("grid-template-columns: repeat({size}, 1fr)");

        html! {
            <div class="tiles picture" {style}>
                {
                    for self.jigsaw.puzzle().tiles().iter().enumerate().map(|(index, &tile)| {
                        let onclick = ctx.link().callback(move |_: MouseEvent| Msg::Slide(index));
                        let class = classes!("tile", (tile == HOLE).then_some("hole"));
                        html! { <div {class} style={self.tile_style(tile, url)} {onclick}/> }
                    })
                }
            </div>
        }
    }
}

impl Component for JigsawView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            jigsaw: Jigsaw::new(),
            rng: game_rng(ctx.props().seed),
            sound: SoundBoard::new(ctx.props().muted),
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        self.sound.set_muted(ctx.props().muted);
        false
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let result = match msg {
            Category(index) => self.jigsaw.choose_category(index).map(|()| Sound::Move),
            Image(index) => self
                .jigsaw
                .choose_image(index, &mut self.rng)
                .map(|()| Sound::Dice),
            Slide(index) => self.jigsaw.slide(index).map(|outcome| match outcome {
                SlideOutcome::Moved => Sound::Move,
                SlideOutcome::Solved => Sound::Win,
            }),
            Back => {
                self.jigsaw.back_to_selection();
                Ok(Sound::Move)
            }
            NextLevel => self.jigsaw.next_level().map(|()| Sound::Move),
        };
        match result {
            Ok(sound) => {
                self.sound.play(sound);
                true
            }
            Err(err) => {
                log::debug!("jigsaw: {:?} ignored: {}", msg, err);
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let size = self.jigsaw.grid_size();
        let cb_back = ctx.link().callback(|_: MouseEvent| Msg::Back);
        let url = self.jigsaw.image_url().unwrap_or_default();

        let body = match self.jigsaw.stage() {
            Stage::Selection => self.view_categories(ctx),
            Stage::ImageSelection { category } => self.view_images(ctx, category),
            Stage::Playing { .. } => html! {
                <>
                    { self.view_board(ctx, url) }
                    <p class="hint">{"Click the pieces next to the empty space to move them."}</p>
                </>
            },
            Stage::Won { .. } => html! {
                <>
                    <img class="solved" src={url} alt="Solved picture"/>
                    <GameOverModal
                        outcome={Outcome::Won}
                        title="CONGRATULATIONS!"
                        message="Picture complete."
                        level={self.jigsaw.level() + 1}
                        restart_label="NEXT LEVEL"
                        on_restart={ctx.link().callback(|_: MouseEvent| Msg::NextLevel)}
                    />
                </>
            },
        };

        html! {
            <div class="game jigsaw">
                <Toolbar title="Picture Puzzle" on_restart={cb_back}>
                    <p class="status">{format!("Level {} · {size}x{size}", self.jigsaw.level())}</p>
                </Toolbar>
                { body }
                <HelpPanel title="Picture Puzzle" rules={RULES} video="z7F0S12Rndw"/>
            </div>
        }
    }
}
