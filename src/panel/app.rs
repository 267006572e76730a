use crate::config::{affects_namespace, GroupItem, Settings, SETTINGS_NAMESPACE};
use crate::message::{GroupTarget, PanelMessage, TRAY_GROUP_INDEX};
use crate::panel::render::{self, PanelView, SectionView};
use crate::store::StateStore;
use crate::usage::{clamp_limit, UsageRecord, UsageTracker, RECENTLY_USED_TITLE};
use crate::view_state::{GroupKey, ViewStateStore};

/// What the panel needs from the editor it lives in
pub trait Host {
    /// Insert `text` into the active document as a snippet.
    ///
    /// Returns `false` when there is no document to insert into.
    fn insert_snippet(&mut self, text: &str) -> bool;

    /// Open the settings UI filtered by `query`.
    fn open_settings(&mut self, query: &str);

    /// Replace the panel's content.
    fn set_html(&mut self, html: &str);
}

/// The panel controller: owns the state store and the current settings
pub struct Panel<S: StateStore> {
    store: S,
    settings: Settings,
    styles: String,
}

impl<S: StateStore> Panel<S> {
    /// Create the panel on activation.
    ///
    /// The stored tray is truncated to the configured limit right away, so a
    /// limit lowered between sessions holds before the first render.
    pub fn new(store: S, settings: Settings, styles: String) -> Self {
        let mut panel = Self {
            store,
            settings,
            styles,
        };
        let limit = panel.settings.recently_used_limit;
        panel.tracker().enforce_limit(limit);
        panel
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Usage tracker configured from the current settings
    pub fn tracker(&mut self) -> UsageTracker<'_, S> {
        UsageTracker::new(
            &mut self.store,
            self.settings.show_recently_used,
            self.settings.recently_used_limit,
        )
    }

    pub fn view_state(&mut self) -> ViewStateStore<'_, S> {
        ViewStateStore::new(&mut self.store)
    }

    /// Tray entries as the panel would show them
    pub fn recently_used(&mut self) -> Vec<UsageRecord> {
        let limit = clamp_limit(self.settings.recently_used_limit);
        self.tracker().get_ranked(limit)
    }

    /// Assemble what should be on screen right now.
    pub fn view(&mut self) -> PanelView {
        let tray = if self.settings.show_recently_used {
            let items: Vec<GroupItem> = self
                .recently_used()
                .into_iter()
                .map(|record| self.tray_item(record))
                .collect();
            if items.is_empty() {
                None
            } else {
                let expanded = self.view_state().get_expanded(&GroupKey::RecentlyUsed, true);
                Some(SectionView {
                    title: RECENTLY_USED_TITLE.to_string(),
                    wire_index: TRAY_GROUP_INDEX,
                    expanded,
                    items,
                })
            }
        } else {
            None
        };

        let groups = self.settings.groups.clone();
        let view_state = ViewStateStore::new(&mut self.store);
        let groups = groups
            .into_iter()
            .enumerate()
            .map(|(index, group)| {
                let key = GroupKey::Group(group.name.clone());
                SectionView {
                    expanded: view_state.get_expanded(&key, index == 0),
                    title: group.name,
                    wire_index: index as i64,
                    items: group.items,
                }
            })
            .collect();

        PanelView {
            info_banner: self.settings.show_info_banner,
            tray,
            groups,
        }
    }

    /// Render the panel document.
    pub fn render(&mut self) -> String {
        let view = self.view();
        render::render_html(&view, &self.styles)
    }

    /// Push a fresh render to the host.
    pub fn refresh(&mut self, host: &mut impl Host) {
        let html = self.render();
        host.set_html(&html);
    }

    /// Handle one message from the panel front end.
    pub fn handle(&mut self, message: PanelMessage, host: &mut impl Host) {
        match message {
            PanelMessage::Insert { text, label } => {
                if !host.insert_snippet(&text) {
                    tracing::debug!("No active document, insertion skipped");
                    return;
                }
                self.tracker().record_usage(&text, &label);
                if self.settings.show_recently_used {
                    self.refresh(host);
                }
            }
            PanelMessage::ToggleGroup { target, expanded } => {
                let Some(key) = self.group_key(target) else {
                    tracing::debug!("Ignoring toggle for unknown group {:?}", target);
                    return;
                };
                self.view_state().set_expanded(&key, expanded);
            }
            PanelMessage::ClearRecentlyUsed => {
                self.tracker().clear();
                self.refresh(host);
            }
            PanelMessage::OpenSettings => host.open_settings(SETTINGS_NAMESPACE),
        }
    }

    /// React to a configuration change notification.
    ///
    /// Returns `false` (and does nothing) unless one of `affected_keys` is in
    /// this panel's namespace. Stored usage and view state are kept; only the
    /// tray bound is re-applied before re-rendering.
    pub fn on_configuration_changed(
        &mut self,
        affected_keys: &[String],
        settings: Settings,
        host: &mut impl Host,
    ) -> bool {
        if !affected_keys.iter().any(|k| affects_namespace(k)) {
            return false;
        }

        tracing::info!("Settings changed: {}", affected_keys.join(", "));
        self.settings = settings;
        let limit = self.settings.recently_used_limit;
        self.tracker().enforce_limit(limit);
        self.refresh(host);
        true
    }

    fn group_key(&self, target: GroupTarget) -> Option<GroupKey> {
        match target {
            GroupTarget::RecentlyUsed => Some(GroupKey::RecentlyUsed),
            GroupTarget::ByIndex(index) => self
                .settings
                .groups
                .get(index)
                .map(|g| GroupKey::Group(g.name.clone())),
        }
    }

    /// Tray button for a record; snippet-ness comes from the matching group item
    fn tray_item(&self, record: UsageRecord) -> GroupItem {
        let is_snippet = self
            .settings
            .groups
            .iter()
            .flat_map(|g| &g.items)
            .any(|item| item.text == record.text && item.is_snippet);
        GroupItem {
            label: record.label,
            text: record.text,
            is_snippet,
        }
    }
}
