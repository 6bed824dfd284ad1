use crate::models::{Habit, HabitId};
use crate::store::{progress, HabitStore};
use crate::validate::FormFields;
use std::collections::BTreeMap;

pub type NodeId = usize;

pub const HABIT_FIELDS: [&str; 3] = ["name", "icon", "target"];
pub const DAY_FIELDS: [&str; 1] = ["comment"];

pub const ICONS: &[(&str, &str)] = &[
    ("run", "🏃"),
    ("water", "💧"),
    ("book", "📖"),
    ("food", "🥗"),
    ("sleep", "😴"),
    ("meditate", "🧘"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Form {
    Habit,
    Day,
}

impl Form {
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Form::Habit => &HABIT_FIELDS,
            Form::Day => &DAY_FIELDS,
        }
    }
}

/// Stable anchors the renderer relies on. Any `Dom` must resolve each of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Region {
    Menu,
    Title,
    ProgressPercent,
    ProgressBar,
    DaysList,
    NextDay,
    Popup,
    Notice,
    Field(Form, &'static str),
}

/// Event payload bound to an element; carries its target as typed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SelectHabit(HabitId),
    RemoveDay { habit: HabitId, index: usize },
    TogglePopup,
}

impl Action {
    pub fn route(&self) -> String {
        match self {
            Action::SelectHabit(id) => format!("/habits/{id}/select"),
            Action::RemoveDay { habit, index } => format!("/habits/{habit}/days/{index}/delete"),
            Action::TogglePopup => "/popup/toggle".to_string(),
        }
    }
}

pub trait Dom {
    fn region(&self, region: Region) -> NodeId;
    fn create_element(&mut self, tag: &'static str) -> NodeId;
    fn append_child(&mut self, parent: NodeId, child: NodeId);
    fn clear_children(&mut self, parent: NodeId);
    fn set_text(&mut self, node: NodeId, text: &str);
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);
    fn toggle_class(&mut self, node: NodeId, class: &str, on: bool);
    fn on_event(&mut self, node: NodeId, action: Action);
}

pub fn icon_glyph(icon: &str) -> String {
    ICONS
        .iter()
        .find(|(key, _)| *key == icon)
        .map(|(_, glyph)| glyph.to_string())
        .or_else(|| icon.chars().next().map(|c| c.to_uppercase().collect()))
        .unwrap_or_else(|| "?".to_string())
}

/// Keeps the menu, header and day list in line with a `HabitStore`.
///
/// Menu entries are created once per habit id and then only have their
/// active marker toggled; the day list is rebuilt on every pass.
#[derive(Debug, Default)]
pub struct Renderer {
    menu_items: BTreeMap<HabitId, NodeId>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn menu_item(&self, id: HabitId) -> Option<NodeId> {
        self.menu_items.get(&id).copied()
    }

    pub fn render(&mut self, dom: &mut impl Dom, store: &HabitStore) {
        let active = store.active_habit();
        self.render_menu(dom, store.habits(), store.active_id());
        render_header(dom, active);
        render_days(dom, active);
    }

    fn render_menu(&mut self, dom: &mut impl Dom, habits: &[Habit], active: Option<HabitId>) {
        let menu = dom.region(Region::Menu);
        for habit in habits {
            let node = match self.menu_items.get(&habit.id) {
                Some(node) => *node,
                None => {
                    let node = dom.create_element("button");
                    dom.toggle_class(node, "menu__item", true);
                    dom.set_attribute(node, "data-habit-id", &habit.id.to_string());
                    dom.set_attribute(node, "title", &habit.name);
                    dom.set_text(node, &icon_glyph(&habit.icon));
                    dom.on_event(node, Action::SelectHabit(habit.id));
                    dom.append_child(menu, node);
                    self.menu_items.insert(habit.id, node);
                    node
                }
            };
            dom.toggle_class(node, "menu__item_active", active == Some(habit.id));
        }
    }

    pub fn flag_fields(&self, dom: &mut impl Dom, form: Form, invalid: &[String]) {
        for field in form.fields() {
            let node = dom.region(Region::Field(form, *field));
            dom.toggle_class(node, "error", invalid.iter().any(|name| name.as_str() == *field));
        }
    }

    /// Writes submitted values back into the form; an empty map resets it.
    pub fn fill_fields(&self, dom: &mut impl Dom, form: Form, values: &FormFields) {
        for field in form.fields() {
            let node = dom.region(Region::Field(form, *field));
            let value = values.get(*field).map(String::as_str).unwrap_or_default();
            dom.set_attribute(node, "value", value);
        }
    }

    pub fn show_popup(&self, dom: &mut impl Dom, open: bool) {
        let popup = dom.region(Region::Popup);
        dom.toggle_class(popup, "cover_hidden", !open);
    }

    pub fn show_notice(&self, dom: &mut impl Dom, notice: Option<&str>) {
        let node = dom.region(Region::Notice);
        dom.set_text(node, notice.unwrap_or_default());
        dom.toggle_class(node, "status_hidden", notice.is_none());
    }
}

fn render_header(dom: &mut impl Dom, active: Option<&Habit>) {
    let (name, percent) = match active {
        Some(habit) => (habit.name.as_str(), progress(habit.days.len(), &habit.target)),
        None => ("", 0),
    };

    let title = dom.region(Region::Title);
    dom.set_text(title, name);
    let label = dom.region(Region::ProgressPercent);
    dom.set_text(label, &format!("{percent} %"));
    let bar = dom.region(Region::ProgressBar);
    dom.set_attribute(bar, "style", &format!("width: {percent}%"));
}

fn render_days(dom: &mut impl Dom, active: Option<&Habit>) {
    let list = dom.region(Region::DaysList);
    dom.clear_children(list);

    let days = active.map(|habit| habit.days.as_slice()).unwrap_or_default();
    if let Some(habit) = active {
        for (index, day) in days.iter().enumerate() {
            let number = index + 1;
            let row = dom.create_element("div");
            dom.toggle_class(row, "habit", true);

            let label = dom.create_element("div");
            dom.toggle_class(label, "habit__day", true);
            dom.set_text(label, &format!("Day {number}"));
            dom.append_child(row, label);

            let comment = dom.create_element("div");
            dom.toggle_class(comment, "habit__comment", true);
            dom.set_text(comment, &day.comment);
            dom.append_child(row, comment);

            let delete = dom.create_element("button");
            dom.toggle_class(delete, "habit__delete", true);
            dom.set_attribute(delete, "aria-label", &format!("Delete day {number}"));
            dom.set_text(delete, "✕");
            dom.on_event(delete, Action::RemoveDay { habit: habit.id, index });
            dom.append_child(row, delete);

            dom.append_child(list, row);
        }
    }

    let next = dom.region(Region::NextDay);
    dom.set_text(next, &format!("Day {}", days.len() + 1));
}
