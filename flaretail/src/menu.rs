//! Menu and menu bar widgets.
//!
//! A [`Menu`] is a [`Composite`] over the `menuitem` children of a `menu`
//! container. An item whose subtree holds a nested `menu` node anchors a
//! submenu; submenus are bound recursively at scan time and opened and
//! closed as the highlight moves. Input enters at the root and is routed
//! down the open chain; a child answers with a [`MenuSignal`] so closing
//! propagates back toward the root one level at a time.
//!
//! Menus highlight with focus only. Selection is reserved for activation:
//! pressing Enter (or the pointer) on a leaf item selects it, which emits
//! [`WidgetEvent::Selected`], then tears the whole chain down.
//!
//! [`MenuBar`] is the horizontal variant: bar items anchor drop-down menus,
//! Left/Right cycle the bar (switching menus while one is open) and
//! Down/Enter/Up open the focused item's menu.

use std::sync::{Arc, RwLock};

use ariadom::{NodeId, NodeTree, Role};

use crate::composite::{Composite, CompositeOptions, Orientation};
use crate::error::WidgetError;
use crate::event::{EventQueue, EventResult, WidgetEvent};
use crate::input::{Key, KeyCombo, Modifiers, PointerButton};
use crate::traits::{AsComposite, Nestable, WidgetEvents};

/// Outcome of routing input down an open submenu chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuSignal {
    Ignored,
    Consumed,
    /// Close the level the input was handled in (Left)
    CloseOne,
    /// Tear down the whole chain (Escape, or a leaf item activated)
    CloseAll,
}

/// Where focus lands when a drop-down opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuFocus {
    /// Stay on the bar item
    Bar,
    First,
    Last,
}

// -----------------------------------------------------------------------------
// Menu
// -----------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MenuInner {
    /// Submenus keyed by the member item that anchors them
    submenus: Vec<(NodeId, Menu)>,
    /// Anchor of the currently open submenu
    open_submenu: Option<NodeId>,
    open: bool,
    /// Node focus returns to when a context menu closes
    invoker: Option<NodeId>,
}

#[derive(Debug)]
pub struct Menu {
    composite: Composite,
    inner: Arc<RwLock<MenuInner>>,
}

impl Clone for Menu {
    fn clone(&self) -> Self {
        Self {
            composite: self.composite.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Menu {
    /// Bind to an existing `menu` container and scan its items for nested
    /// submenus. The menu starts closed; call [`Menu::open`].
    pub fn bind(
        tree: &NodeTree,
        container: NodeId,
        queue: &EventQueue,
    ) -> Result<Self, WidgetError> {
        let role = tree.role(container).ok_or(WidgetError::MissingContainer)?;
        if role != Role::Menu {
            return Err(WidgetError::RoleMismatch {
                expected: Role::Menu,
                found: role,
            });
        }
        let options = CompositeOptions::new(vec![Role::MenuItem]).focus_cycling(true);
        let composite = Composite::bind(tree, container, options, queue)?;
        let menu = Self {
            composite,
            inner: Arc::new(RwLock::new(MenuInner::default())),
        };
        let submenus = scan_child_menus(&menu.composite);
        if let Ok(mut inner) = menu.inner.write() {
            inner.submenus = submenus;
        }
        Ok(menu)
    }

    pub fn container(&self) -> NodeId {
        self.composite.container()
    }

    pub fn is_open(&self) -> bool {
        self.inner.read().map(|inner| inner.open).unwrap_or(false)
    }

    /// The submenu anchored at `anchor`, if that item has one.
    pub fn submenu(&self, anchor: NodeId) -> Option<Menu> {
        self.inner.read().ok().and_then(|inner| {
            inner
                .submenus
                .iter()
                .find(|(item, _)| *item == anchor)
                .map(|(_, submenu)| submenu.clone())
        })
    }

    /// Anchor item of the currently open submenu.
    pub fn open_submenu_anchor(&self) -> Option<NodeId> {
        self.inner.read().ok().and_then(|inner| inner.open_submenu)
    }

    // -------------------------------------------------------------------------
    // Open / close
    // -------------------------------------------------------------------------

    /// Open as a context menu: the currently focused node is recorded as the
    /// invoker and gets focus back when the menu closes.
    pub fn open(&self) {
        let invoker = self.composite.tree().focus();
        self.open_internal(invoker);
    }

    fn open_internal(&self, invoker: Option<NodeId>) {
        {
            let Ok(mut inner) = self.inner.write() else {
                return;
            };
            if inner.open {
                return;
            }
            inner.open = true;
            inner.invoker = invoker;
        }
        let tree = self.composite.tree();
        tree.set_hidden(self.composite.container(), false);
        self.composite.refresh_members();
        log::debug!("[menu] {} opened", self.composite.id());
        self.composite.queue().push(WidgetEvent::MenuOpened {
            menu: self.composite.id(),
        });
    }

    /// Close this menu and everything below it. Clears the highlight and the
    /// selection, hides the container and hands focus back to the invoker.
    pub fn close(&self) {
        let (open_submenu, invoker) = {
            let Ok(mut inner) = self.inner.write() else {
                return;
            };
            if !inner.open {
                return;
            }
            inner.open = false;
            (inner.open_submenu.take(), inner.invoker.take())
        };
        let tree = self.composite.tree();
        if let Some(anchor) = open_submenu {
            tree.set_expanded(anchor, false);
            if let Some(submenu) = self.submenu(anchor) {
                submenu.close();
            }
        }
        self.composite.set_selected(&[]);
        self.composite.set_focused(None);
        tree.set_hidden(self.composite.container(), true);
        if let Some(node) = invoker
            && tree.contains(node)
        {
            tree.set_focus(Some(node));
        }
        log::debug!("[menu] {} closed", self.composite.id());
        self.composite.queue().push(WidgetEvent::MenuClosed {
            menu: self.composite.id(),
        });
    }

    fn open_submenu(&self, anchor: NodeId) {
        let Some(submenu) = self.submenu(anchor) else {
            return;
        };
        let previous = {
            let Ok(mut inner) = self.inner.write() else {
                return;
            };
            if inner.open_submenu == Some(anchor) {
                return;
            }
            inner.open_submenu.replace(anchor)
        };
        let tree = self.composite.tree();
        if let Some(old) = previous {
            tree.set_expanded(old, false);
            if let Some(old_menu) = self.submenu(old) {
                old_menu.close();
            }
        }
        tree.set_expanded(anchor, true);
        submenu.open_internal(None);
    }

    fn close_submenu(&self, anchor: NodeId) {
        let was_open = {
            let Ok(mut inner) = self.inner.write() else {
                return;
            };
            if inner.open_submenu == Some(anchor) {
                inner.open_submenu = None;
                true
            } else {
                false
            }
        };
        if !was_open {
            return;
        }
        self.composite.tree().set_expanded(anchor, false);
        if let Some(submenu) = self.submenu(anchor) {
            submenu.close();
        }
    }

    // -------------------------------------------------------------------------
    // Highlight
    // -------------------------------------------------------------------------

    /// Move the highlight to `item`: focus it, close the previously open
    /// submenu and open the new item's submenu without entering it.
    fn set_highlight(&self, item: NodeId) {
        if self.submenu(item).is_some() {
            self.composite.set_focused(Some(item));
            self.open_submenu(item);
        } else {
            if let Some(previous) = self.open_submenu_anchor() {
                self.close_submenu(previous);
            }
            self.composite.set_focused(Some(item));
        }
    }

    fn focus_step(&self, forward: bool) {
        let members = self.composite.members();
        if members.is_empty() {
            return;
        }
        let index = self
            .composite
            .focused()
            .and_then(|f| members.iter().position(|&m| m == f));
        let next = match index {
            None if forward => 0,
            None => members.len() - 1,
            Some(i) if forward => (i + 1) % members.len(),
            Some(i) => (i + members.len() - 1) % members.len(),
        };
        self.set_highlight(members[next]);
    }

    fn focus_edge(&self, last: bool) {
        let members = self.composite.members();
        let target = if last {
            members.last()
        } else {
            members.first()
        };
        if let Some(&item) = target {
            self.set_highlight(item);
        }
    }

    /// Open `anchor`'s submenu and move focus onto its first item.
    fn enter_submenu(&self, anchor: NodeId) {
        let Some(submenu) = self.submenu(anchor) else {
            return;
        };
        self.open_submenu(anchor);
        let first = submenu.composite.members().first().copied();
        submenu.composite.set_focused(first);
    }

    /// Select the leaf item, emitting [`WidgetEvent::Selected`].
    fn activate(&self, item: NodeId) {
        self.composite.set_selected(&[item]);
    }

    /// True when the highlight sits in this menu or anywhere below it.
    fn has_focus_within(&self) -> bool {
        if self.composite.focused().is_some() {
            return true;
        }
        self.open_submenu_anchor()
            .and_then(|anchor| self.submenu(anchor))
            .is_some_and(|submenu| submenu.has_focus_within())
    }

    // -------------------------------------------------------------------------
    // Routing
    // -------------------------------------------------------------------------

    fn route_key(&self, combo: KeyCombo) -> MenuSignal {
        if let Some(anchor) = self.open_submenu_anchor()
            && let Some(submenu) = self.submenu(anchor)
            && submenu.has_focus_within()
        {
            return match submenu.route_key(combo) {
                MenuSignal::CloseOne => {
                    self.close_submenu(anchor);
                    self.composite.set_focused(Some(anchor));
                    MenuSignal::Consumed
                }
                signal => signal,
            };
        }
        self.handle_key_local(combo)
    }

    fn handle_key_local(&self, combo: KeyCombo) -> MenuSignal {
        if !combo.modifiers.none() {
            return MenuSignal::Ignored;
        }
        let focused = self.composite.focused();
        match combo.key {
            Key::Down => {
                self.focus_step(true);
                MenuSignal::Consumed
            }
            Key::Up => {
                self.focus_step(false);
                MenuSignal::Consumed
            }
            Key::Home => {
                self.focus_edge(false);
                MenuSignal::Consumed
            }
            Key::End => {
                self.focus_edge(true);
                MenuSignal::Consumed
            }
            Key::Right => {
                if let Some(item) = focused
                    && self.submenu(item).is_some()
                {
                    self.enter_submenu(item);
                    MenuSignal::Consumed
                } else {
                    // No submenu to enter; a menu bar may cycle instead
                    MenuSignal::Ignored
                }
            }
            Key::Enter | Key::Space => match focused {
                Some(item) if self.submenu(item).is_some() => {
                    self.enter_submenu(item);
                    MenuSignal::Consumed
                }
                Some(item) => {
                    self.activate(item);
                    MenuSignal::CloseAll
                }
                None => MenuSignal::Consumed,
            },
            Key::Left => MenuSignal::CloseOne,
            Key::Escape => MenuSignal::CloseAll,
            _ => MenuSignal::Ignored,
        }
    }

    fn route_press(&self, x: u16, y: u16) -> MenuSignal {
        if let Some(anchor) = self.open_submenu_anchor()
            && let Some(submenu) = self.submenu(anchor)
        {
            let signal = submenu.route_press(x, y);
            if signal != MenuSignal::Ignored {
                return signal;
            }
        }
        let Some(item) = self.composite.member_at_point(x, y) else {
            return MenuSignal::Ignored;
        };
        if self.submenu(item).is_some() {
            if self.open_submenu_anchor() == Some(item) {
                // Second press on an open anchor toggles it closed
                self.close_submenu(item);
                self.composite.set_focused(Some(item));
            } else {
                self.set_highlight(item);
            }
            MenuSignal::Consumed
        } else {
            self.set_highlight(item);
            self.activate(item);
            MenuSignal::CloseAll
        }
    }
}

impl AsComposite for Menu {
    fn composite(&self) -> &Composite {
        &self.composite
    }
}

impl Nestable for Menu {
    fn set_expanded(&self, member: NodeId, expanded: bool) {
        if expanded {
            self.open_submenu(member);
        } else {
            self.close_submenu(member);
        }
    }

    fn is_expanded(&self, member: NodeId) -> bool {
        self.composite.tree().expanded(member).unwrap_or(false)
    }
}

impl WidgetEvents for Menu {
    fn on_key(&self, combo: KeyCombo) -> EventResult {
        if !self.is_open() {
            return EventResult::Ignored;
        }
        match self.route_key(combo) {
            MenuSignal::Ignored => EventResult::Ignored,
            // Left at the root level has nowhere further to go
            MenuSignal::Consumed | MenuSignal::CloseOne => EventResult::Consumed,
            MenuSignal::CloseAll => {
                self.close();
                EventResult::Consumed
            }
        }
    }

    fn on_press(
        &self,
        x: u16,
        y: u16,
        button: PointerButton,
        _modifiers: Modifiers,
    ) -> EventResult {
        if button != PointerButton::Left || !self.is_open() {
            return EventResult::Ignored;
        }
        match self.route_press(x, y) {
            MenuSignal::Ignored => EventResult::Ignored,
            MenuSignal::Consumed | MenuSignal::CloseOne => EventResult::Consumed,
            MenuSignal::CloseAll => {
                self.close();
                EventResult::Consumed
            }
        }
    }
}

// -----------------------------------------------------------------------------
// MenuBar
// -----------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MenuBarInner {
    /// Drop-down menus keyed by the bar item that anchors them
    menus: Vec<(NodeId, Menu)>,
    open_menu: Option<NodeId>,
}

#[derive(Debug)]
pub struct MenuBar {
    composite: Composite,
    inner: Arc<RwLock<MenuBarInner>>,
}

impl Clone for MenuBar {
    fn clone(&self) -> Self {
        Self {
            composite: self.composite.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl MenuBar {
    /// Bind to an existing `menubar` container. Bar items anchoring a nested
    /// `menu` node get a drop-down, bound recursively and starting closed.
    pub fn bind(
        tree: &NodeTree,
        container: NodeId,
        queue: &EventQueue,
    ) -> Result<Self, WidgetError> {
        let role = tree.role(container).ok_or(WidgetError::MissingContainer)?;
        if role != Role::MenuBar {
            return Err(WidgetError::RoleMismatch {
                expected: Role::MenuBar,
                found: role,
            });
        }
        let options = CompositeOptions::new(vec![Role::MenuItem])
            .orientation(Orientation::Horizontal)
            .focus_cycling(true);
        let composite = Composite::bind(tree, container, options, queue)?;
        let bar = Self {
            composite,
            inner: Arc::new(RwLock::new(MenuBarInner::default())),
        };
        let menus = scan_child_menus(&bar.composite);
        if let Ok(mut inner) = bar.inner.write() {
            inner.menus = menus;
        }
        Ok(bar)
    }

    pub fn container(&self) -> NodeId {
        self.composite.container()
    }

    /// Bar item of the currently open drop-down.
    pub fn open_menu(&self) -> Option<NodeId> {
        self.inner.read().ok().and_then(|inner| inner.open_menu)
    }

    /// The drop-down anchored at `item`, if it has one.
    pub fn menu_for(&self, item: NodeId) -> Option<Menu> {
        self.inner.read().ok().and_then(|inner| {
            inner
                .menus
                .iter()
                .find(|(anchor, _)| *anchor == item)
                .map(|(_, menu)| menu.clone())
        })
    }

    fn open_menu_at(&self, item: NodeId, focus: MenuFocus) {
        let Some(menu) = self.menu_for(item) else {
            return;
        };
        let previous = {
            let Ok(mut inner) = self.inner.write() else {
                return;
            };
            inner.open_menu.replace(item)
        };
        if previous != Some(item) {
            let tree = self.composite.tree();
            if let Some(old) = previous {
                tree.set_expanded(old, false);
                if let Some(old_menu) = self.menu_for(old) {
                    old_menu.close();
                }
            }
            tree.set_expanded(item, true);
            menu.open_internal(None);
        }
        match focus {
            MenuFocus::Bar => {}
            MenuFocus::First => {
                let first = menu.composite.members().first().copied();
                menu.composite.set_focused(first);
            }
            MenuFocus::Last => {
                let last = menu.composite.members().last().copied();
                menu.composite.set_focused(last);
            }
        }
    }

    fn close_open_menu(&self, refocus_bar: bool) {
        let taken = self
            .inner
            .write()
            .ok()
            .and_then(|mut inner| inner.open_menu.take());
        let Some(item) = taken else {
            return;
        };
        self.composite.tree().set_expanded(item, false);
        if let Some(menu) = self.menu_for(item) {
            menu.close();
        }
        if refocus_bar {
            self.composite.set_focused(Some(item));
        }
    }

    /// Move the bar highlight. While a drop-down is open, moving switches to
    /// the new item's menu; `enter` puts focus on its first item.
    fn step_bar(&self, forward: bool, enter: bool) {
        let members = self.composite.members();
        if members.is_empty() {
            return;
        }
        let index = self
            .composite
            .focused()
            .and_then(|f| members.iter().position(|&m| m == f));
        let next_index = match index {
            None if forward => 0,
            None => members.len() - 1,
            Some(i) if forward => (i + 1) % members.len(),
            Some(i) => (i + members.len() - 1) % members.len(),
        };
        let next = members[next_index];
        let was_open = self.open_menu().is_some();
        if was_open {
            self.close_open_menu(false);
        }
        self.composite.set_focused(Some(next));
        if was_open {
            let focus = if enter { MenuFocus::First } else { MenuFocus::Bar };
            self.open_menu_at(next, focus);
        }
    }

    fn bar_key(&self, combo: KeyCombo, from_menu: bool) -> EventResult {
        if !combo.modifiers.none() {
            return EventResult::Ignored;
        }
        match combo.key {
            Key::Left => {
                self.step_bar(false, from_menu);
                EventResult::Consumed
            }
            Key::Right => {
                self.step_bar(true, from_menu);
                EventResult::Consumed
            }
            Key::Down | Key::Enter | Key::Space => {
                if let Some(item) = self.composite.focused() {
                    self.open_menu_at(item, MenuFocus::First);
                    EventResult::Consumed
                } else {
                    EventResult::Ignored
                }
            }
            Key::Up => {
                if let Some(item) = self.composite.focused() {
                    self.open_menu_at(item, MenuFocus::Last);
                    EventResult::Consumed
                } else {
                    EventResult::Ignored
                }
            }
            Key::Escape => {
                if self.open_menu().is_some() {
                    self.close_open_menu(true);
                    EventResult::Consumed
                } else {
                    EventResult::Ignored
                }
            }
            _ => EventResult::Ignored,
        }
    }
}

impl AsComposite for MenuBar {
    fn composite(&self) -> &Composite {
        &self.composite
    }
}

impl WidgetEvents for MenuBar {
    fn on_key(&self, combo: KeyCombo) -> EventResult {
        if let Some(anchor) = self.open_menu()
            && let Some(menu) = self.menu_for(anchor)
            && menu.has_focus_within()
        {
            return match menu.route_key(combo) {
                // Right past a leaf falls back to cycling the bar
                MenuSignal::Ignored => self.bar_key(combo, true),
                MenuSignal::Consumed => EventResult::Consumed,
                MenuSignal::CloseOne => {
                    // Left at the drop-down root switches to the previous menu
                    self.step_bar(false, true);
                    EventResult::Consumed
                }
                MenuSignal::CloseAll => {
                    self.close_open_menu(true);
                    EventResult::Consumed
                }
            };
        }
        self.bar_key(combo, false)
    }

    fn on_press(
        &self,
        x: u16,
        y: u16,
        button: PointerButton,
        _modifiers: Modifiers,
    ) -> EventResult {
        if button != PointerButton::Left {
            return EventResult::Ignored;
        }
        if let Some(anchor) = self.open_menu()
            && let Some(menu) = self.menu_for(anchor)
        {
            match menu.route_press(x, y) {
                MenuSignal::Ignored => {}
                MenuSignal::Consumed | MenuSignal::CloseOne => return EventResult::Consumed,
                MenuSignal::CloseAll => {
                    self.close_open_menu(true);
                    return EventResult::Consumed;
                }
            }
        }
        let Some(item) = self.composite.member_at_point(x, y) else {
            return EventResult::Ignored;
        };
        if self.open_menu() == Some(item) {
            self.close_open_menu(true);
        } else {
            self.composite.set_focused(Some(item));
            self.open_menu_at(item, MenuFocus::Bar);
        }
        EventResult::Consumed
    }
}

/// Scan a composite's members for nested `menu` children, hiding them and
/// binding each as a closed submenu.
fn scan_child_menus(composite: &Composite) -> Vec<(NodeId, Menu)> {
    let tree = composite.tree();
    let mut menus = Vec::new();
    for item in composite.members() {
        let nested = tree
            .children(item)
            .into_iter()
            .find(|&child| tree.role(child) == Some(Role::Menu));
        let Some(child) = nested else {
            continue;
        };
        tree.set_hidden(child, true);
        tree.set_expanded(item, false);
        if let Ok(submenu) = Menu::bind(tree, child, composite.queue()) {
            menus.push((item, submenu));
        }
    }
    menus
}
