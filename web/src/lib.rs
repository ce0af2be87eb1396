use clap::Parser;
use wasm_bindgen::prelude::*;

mod app;
mod games;
mod sound;
mod utils;

#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

impl Args {
    /// Flags live next to the route in the hash, e.g. `#/maze&-vv&--seed=7`.
    fn from_hash(hash: &str) -> Result<Self, clap::Error> {
        let flags = hash.split(['#', '&']).filter(|part| part.starts_with('-'));
        Self::try_parse_from(std::iter::once("multigame").chain(flags))
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window().location().hash().unwrap_or_default();
    let args = match Args::from_hash(&location_hash) {
        Ok(args) => args,
        Err(err) => {
            gloo::console::warn!(format!("ignoring bad flags: {err}"));
            Args::default()
        }
    };
    if let Some(log_level) = args.verbose.log_level()
        && let Err(err) = console_log::init_with_level(log_level)
    {
        gloo::console::error!(format!("Error initializing logger: {err}"));
    }
    log::debug!("seed: {:?}", args.seed);

    let props = app::AppProps { seed: args.seed };
    match document().get_element_by_id("app") {
        Some(root) => {
            yew::Renderer::<app::App>::with_root_and_props(root, props).render();
        }
        None => {
            log::warn!("no id=\"app\" element, mounting on body");
            yew::Renderer::<app::App>::with_props(props).render();
        }
    }
    log::debug!("App started");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_read_around_the_route() {
        let args = Args::from_hash("#/racing&-vv&--seed=42").unwrap();

        assert_eq!(args.seed, Some(42));
        assert_eq!(args.verbose.log_level(), Some(log::Level::Info));
    }

    #[test]
    fn plain_route_has_no_flags() {
        let args = Args::from_hash("#/chess").unwrap();

        assert_eq!(args.seed, None);
        assert!(Args::from_hash("#/chess&--seed=nope").is_err());
    }
}
