use gloo::storage::{LocalStorage, Storage};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use serde::de::DeserializeOwned;
use yew::prelude::*;

/// Local storage slot of a persisted setting.
pub(crate) trait StorageKey {
    const KEY: &'static str;
}

pub(crate) trait LocalOrDefault: Sized {
    fn local_or_default() -> Self;
    fn local_save(&self);
}

impl<T> LocalOrDefault for T
where
    T: StorageKey + Default + Serialize + DeserializeOwned,
{
    fn local_or_default() -> Self {
        LocalStorage::get(T::KEY).unwrap_or_else(|err| {
            log::debug!("{} not loaded: {:?}", T::KEY, err);
            T::default()
        })
    }

    fn local_save(&self) {
        if let Err(err) = LocalStorage::set(T::KEY, self) {
            log::error!("Could not save {} to local storage: {:?}", T::KEY, err);
        }
    }
}

impl StorageKey for multigame_core::racing::Garage {
    const KEY: &'static str = "multigame:racing:garage";
}

impl StorageKey for multigame_core::arcade::KeyBindings {
    const KEY: &'static str = "multigame:racing:keys";
}

/// Global sound switch, persisted as a bare boolean.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(transparent)]
pub(crate) struct Muted(pub bool);

impl StorageKey for Muted {
    const KEY: &'static str = "multigame:muted";
}

#[derive(Properties, PartialEq)]
pub(crate) struct ModalProps {
    #[prop_or_default]
    pub children: Html,
}

/// Helper component to attach the contents into the document.body instead of in the place where it's used.
#[function_component]
pub(crate) fn Modal(props: &ModalProps) -> Html {
    let modal_host = gloo::utils::body();
    create_portal(props.children.clone(), modal_host.into())
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

/// RNG for one mounted game; a fixed seed makes every remount replay the same deal.
pub(crate) fn game_rng(seed: Option<u64>) -> SmallRng {
    SmallRng::seed_from_u64(seed.unwrap_or_else(js_random_seed))
}

#[cfg(test)]
mod tests {
    use multigame_core::arcade::KeyBindings;
    use multigame_core::racing::Garage;
    use rand::Rng;

    use super::*;

    #[test]
    fn storage_keys_share_one_namespace() {
        for key in [Muted::KEY, Garage::KEY, KeyBindings::KEY] {
            assert!(key.starts_with("multigame:"), "{key}");
        }
        assert_ne!(Garage::KEY, KeyBindings::KEY);
    }

    #[test]
    fn muted_is_stored_as_plain_bool() {
        assert_eq!(serde_json::to_string(&Muted(true)).unwrap(), "true");
        assert_eq!(serde_json::from_str::<Muted>("false").unwrap(), Muted(false));
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let a: u32 = game_rng(Some(9)).random();
        let b: u32 = game_rng(Some(9)).random();
        assert_eq!(a, b);
    }
}
