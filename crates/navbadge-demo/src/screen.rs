#![forbid(unsafe_code)]

//! The badges screen: glue between navigation, menu actions and the store.
//!
//! The screen owns its store subscription for as long as it is attached.
//! Detaching, or dropping the screen, releases it.
//!
//! | Event                      | Store operation          |
//! |----------------------------|--------------------------|
//! | arrive at `First`          | `hide_small_badge()`     |
//! | arrive at `Third`          | `clear_large_badge()`    |
//! | menu `activate`            | `show_small_badge()`     |
//! | menu `increase`            | `increase_large_badge()` |

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use navbadge_runtime::{BadgeStore, Subscription};
use navbadge_widgets::{BadgeRenderer, Destination, NavigationState};

/// Action-bar entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Show the dot badge.
    Activate,
    /// Bump the numeric badge.
    Increase,
}

impl MenuAction {
    /// Look up a menu item by id.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "activate" => Some(Self::Activate),
            "increase" => Some(Self::Increase),
            _ => None,
        }
    }

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::Increase => "increase",
        }
    }
}

pub struct BadgesScreen<R> {
    store: BadgeStore,
    navigation: NavigationState,
    renderer: Rc<RefCell<R>>,
    subscription: Option<Subscription>,
}

impl<R: BadgeRenderer + 'static> BadgesScreen<R> {
    #[must_use]
    pub fn new(store: BadgeStore, renderer: R) -> Self {
        Self {
            store,
            navigation: NavigationState::default(),
            renderer: Rc::new(RefCell::new(renderer)),
            subscription: None,
        }
    }

    /// Subscribe the renderer and deliver arrival at the current
    /// destination. No-op when already attached.
    pub fn attach(&mut self) {
        if self.subscription.is_some() {
            return;
        }
        let renderer = Rc::clone(&self.renderer);
        self.subscription = Some(
            self.store
                .subscribe(move |state| renderer.borrow_mut().paint(state)),
        );
        tracing::debug!(destination = %self.navigation.active(), "badges screen attached");
        self.on_destination_changed(self.navigation.active());
    }

    /// Release the store subscription. The renderer keeps its last paint.
    pub fn detach(&mut self) {
        if self.subscription.take().is_some() {
            tracing::debug!("badges screen detached");
        }
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Select `destination`. Returns whether the selection moved.
    pub fn navigate(&mut self, destination: Destination) -> bool {
        let changed = self.navigation.select(destination);
        self.arrive(changed)
    }

    pub fn next(&mut self) -> bool {
        let changed = self.navigation.next();
        self.arrive(changed)
    }

    pub fn previous(&mut self) -> bool {
        let changed = self.navigation.previous();
        self.arrive(changed)
    }

    fn arrive(&self, changed: Option<Destination>) -> bool {
        match changed {
            Some(destination) => {
                self.on_destination_changed(destination);
                true
            }
            None => false,
        }
    }

    fn on_destination_changed(&self, destination: Destination) {
        match destination {
            Destination::First => self.store.hide_small_badge(),
            Destination::Third => self.store.clear_large_badge(),
            Destination::Second | Destination::Fourth => {}
        }
    }

    pub fn on_menu_action(&self, action: MenuAction) {
        match action {
            MenuAction::Activate => self.store.show_small_badge(),
            MenuAction::Increase => self.store.increase_large_badge(),
        }
    }

    /// Handle a menu selection by item id. Unknown ids are left to the
    /// caller and return `false`.
    pub fn on_menu_item_selected(&self, id: &str) -> bool {
        match MenuAction::from_id(id) {
            Some(action) => {
                self.on_menu_action(action);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn store(&self) -> &BadgeStore {
        &self.store
    }

    #[must_use]
    pub fn navigation(&self) -> NavigationState {
        self.navigation
    }

    /// Borrow the renderer. Release the borrow before the next store
    /// operation.
    #[must_use]
    pub fn renderer(&self) -> Ref<'_, R> {
        self.renderer.borrow()
    }
}
