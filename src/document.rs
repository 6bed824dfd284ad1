use crate::view::{Action, Dom, Form, NodeId, Region, ICONS};
use std::collections::BTreeMap;
use tracing::warn;

const VOID_TAGS: &[&str] = &["input", "img", "br", "hr", "meta"];

#[derive(Debug, Clone)]
struct Node {
    tag: &'static str,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    text: Option<String>,
    children: Vec<NodeId>,
    action: Option<Action>,
}

impl Node {
    fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            text: None,
            children: Vec::new(),
            action: None,
        }
    }
}

/// In-memory element tree holding the page between requests.
///
/// Nodes live in an arena; clearing a subtree returns its slots to a free
/// list so repeated day-list rebuilds do not grow the arena.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Option<Node>>,
    free: Vec<NodeId>,
    root: NodeId,
    detached: NodeId,
    regions: BTreeMap<Region, NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: 0,
            detached: 0,
            regions: BTreeMap::new(),
        };
        doc.root = doc.create_element("div");
        doc.toggle_class(doc.root, "app", true);
        doc.detached = doc.create_element("div");

        doc.build_menu();
        doc.build_content();
        doc.build_popup();
        doc
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|node| node.children.as_slice()).unwrap_or_default()
    }

    pub fn text(&self, id: NodeId) -> &str {
        self.node(id)
            .and_then(|node| node.text.as_deref())
            .unwrap_or_default()
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)?.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id)
            .is_some_and(|node| node.classes.iter().any(|c| c == class))
    }

    pub fn action(&self, id: NodeId) -> Option<Action> {
        self.node(id)?.action
    }

    pub fn live_nodes(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_some()).count()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_node(self.root, &mut out);
        out
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id).and_then(Option::as_mut)
    }

    fn release(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id).and_then(Option::take) else {
            return;
        };
        self.free.push(id);
        for child in node.children {
            self.release(child);
        }
    }

    fn element(&mut self, parent: NodeId, tag: &'static str, classes: &[&str]) -> NodeId {
        let node = self.create_element(tag);
        for class in classes {
            self.toggle_class(node, class, true);
        }
        self.append_child(parent, node);
        node
    }

    fn input(&mut self, parent: NodeId, form: Form, name: &'static str, placeholder: &str) -> NodeId {
        let node = self.element(parent, "input", &["input"]);
        self.set_attribute(node, "name", name);
        self.set_attribute(node, "placeholder", placeholder);
        self.set_attribute(node, "autocomplete", "off");
        self.regions.insert(Region::Field(form, name), node);
        node
    }

    fn build_menu(&mut self) {
        let aside = self.element(self.root, "aside", &["menu"]);
        let nav = self.element(aside, "nav", &[]);
        let list = self.element(nav, "div", &["menu__list"]);
        self.regions.insert(Region::Menu, list);

        let add = self.element(aside, "button", &["menu__add"]);
        self.set_attribute(add, "aria-label", "New habit");
        self.set_text(add, "+");
        self.on_event(add, Action::TogglePopup);
    }

    fn build_content(&mut self) {
        let main = self.element(self.root, "main", &["content"]);

        let header = self.element(main, "header", &["header"]);
        let title = self.element(header, "h1", &["h1"]);
        self.regions.insert(Region::Title, title);
        let progress = self.element(header, "div", &["progress"]);
        let text = self.element(progress, "div", &["progress__text"]);
        let name = self.element(text, "span", &["progress__name"]);
        self.set_text(name, "Progress");
        let percent = self.element(text, "span", &["progress__percent"]);
        self.regions.insert(Region::ProgressPercent, percent);
        let bar = self.element(progress, "div", &["progress__bar"]);
        let cover = self.element(bar, "div", &["progress__cover-bar"]);
        self.regions.insert(Region::ProgressBar, cover);

        let notice = self.element(main, "div", &["status", "status_hidden"]);
        self.regions.insert(Region::Notice, notice);

        let days = self.element(main, "section", &["days-list"]);
        self.regions.insert(Region::DaysList, days);

        let form = self.element(main, "form", &["habit", "habit_next"]);
        self.set_attribute(form, "method", "post");
        self.set_attribute(form, "action", "/days");
        let next = self.element(form, "div", &["habit__day"]);
        self.regions.insert(Region::NextDay, next);
        let comment = self.element(form, "div", &["habit__comment"]);
        self.input(comment, Form::Day, "comment", "Comment");
        let submit = self.element(comment, "button", &["button"]);
        self.set_attribute(submit, "type", "submit");
        self.set_text(submit, "Done");
    }

    fn build_popup(&mut self) {
        let cover = self.element(self.root, "div", &["cover", "cover_hidden"]);
        self.regions.insert(Region::Popup, cover);
        let popup = self.element(cover, "div", &["popup"]);

        let close = self.element(popup, "button", &["popup__close"]);
        self.set_attribute(close, "aria-label", "Close");
        self.set_text(close, "✕");
        self.on_event(close, Action::TogglePopup);

        let heading = self.element(popup, "h2", &[]);
        self.set_text(heading, "New habit");

        let form = self.element(popup, "form", &["popup__form"]);
        self.set_attribute(form, "method", "post");
        self.set_attribute(form, "action", "/habits");
        self.input(form, Form::Habit, "name", "Name");
        let icon = self.input(form, Form::Habit, "icon", "Icon");
        self.set_attribute(icon, "list", "icons");
        let options = self.element(form, "datalist", &[]);
        self.set_attribute(options, "id", "icons");
        for (key, glyph) in ICONS {
            let option = self.element(options, "option", &[]);
            self.set_attribute(option, "value", key);
            self.set_text(option, &format!("{glyph} {key}"));
        }
        let target = self.input(form, Form::Habit, "target", "Target days");
        self.set_attribute(target, "type", "number");
        self.set_attribute(target, "min", "1");
        let submit = self.element(form, "button", &["button"]);
        self.set_attribute(submit, "type", "submit");
        self.set_text(submit, "Add");
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        if let Some(action) = node.action {
            out.push_str(&format!(
                r#"<form class="action" method="post" action="{}">"#,
                escape(&action.route())
            ));
        }

        out.push('<');
        out.push_str(node.tag);
        if !node.classes.is_empty() {
            out.push_str(&format!(r#" class="{}""#, escape(&node.classes.join(" "))));
        }
        for (name, value) in &node.attributes {
            out.push_str(&format!(r#" {name}="{}""#, escape(value)));
        }
        if node.action.is_some() && !node.attributes.contains_key("type") {
            out.push_str(r#" type="submit""#);
        }
        out.push('>');

        if !VOID_TAGS.contains(&node.tag) {
            if let Some(text) = &node.text {
                out.push_str(&escape(text));
            }
            for child in &node.children {
                self.write_node(*child, out);
            }
            out.push_str(&format!("</{}>", node.tag));
        }

        if node.action.is_some() {
            out.push_str("</form>");
        }
    }
}

impl Dom for Document {
    fn region(&self, region: Region) -> NodeId {
        match self.regions.get(&region) {
            Some(id) => *id,
            None => {
                warn!(?region, "region missing from document");
                self.detached
            }
        }
    }

    fn create_element(&mut self, tag: &'static str) -> NodeId {
        let node = Node::new(tag);
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    fn clear_children(&mut self, parent: NodeId) {
        let children = match self.node_mut(parent) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            self.release(child);
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        if let Some(node) = self.node_mut(node) {
            node.text = Some(text.to_string());
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(node) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn toggle_class(&mut self, node: NodeId, class: &str, on: bool) {
        let Some(node) = self.node_mut(node) else {
            return;
        };
        let present = node.classes.iter().position(|c| c == class);
        match (present, on) {
            (None, true) => node.classes.push(class.to_string()),
            (Some(index), false) => {
                node.classes.remove(index);
            }
            _ => {}
        }
    }

    fn on_event(&mut self, node: NodeId, action: Action) {
        if let Some(node) = self.node_mut(node) {
            node.action = Some(action);
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{DAY_FIELDS, HABIT_FIELDS};

    #[test]
    fn every_region_is_part_of_the_page() {
        let doc = Document::new();
        let mut regions = vec![
            Region::Menu,
            Region::Title,
            Region::ProgressPercent,
            Region::ProgressBar,
            Region::DaysList,
            Region::NextDay,
            Region::Popup,
            Region::Notice,
        ];
        regions.extend(HABIT_FIELDS.iter().map(|f| Region::Field(Form::Habit, *f)));
        regions.extend(DAY_FIELDS.iter().map(|f| Region::Field(Form::Day, *f)));

        for region in regions {
            assert_ne!(doc.region(region), doc.detached, "{region:?}");
        }
    }

    #[test]
    fn text_is_escaped() {
        let mut doc = Document::new();
        let title = doc.region(Region::Title);
        doc.set_text(title, "<b>\"Run\" & 'walk'</b>");
        let html = doc.to_html();
        assert!(html.contains("&lt;b&gt;&quot;Run&quot; &amp; &#39;walk&#39;&lt;/b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn bound_actions_become_post_forms() {
        let mut doc = Document::new();
        let list = doc.region(Region::DaysList);
        let button = doc.create_element("button");
        doc.on_event(button, Action::RemoveDay { habit: 4, index: 2 });
        doc.append_child(list, button);

        let html = doc.to_html();
        assert!(html.contains(
            r#"<form class="action" method="post" action="/habits/4/days/2/delete"><button type="submit"></button></form>"#
        ));
        assert!(!html.contains("onclick"));
    }

    #[test]
    fn cleared_subtrees_are_reused() {
        let mut doc = Document::new();
        let list = doc.region(Region::DaysList);
        let baseline = doc.live_nodes();

        for _ in 0..5 {
            doc.clear_children(list);
            for _ in 0..3 {
                let row = doc.create_element("div");
                let child = doc.create_element("span");
                doc.append_child(row, child);
                doc.append_child(list, row);
            }
        }
        assert_eq!(doc.live_nodes(), baseline + 6);
        assert_eq!(doc.children(list).len(), 3);
    }

    #[test]
    fn toggle_class_is_idempotent() {
        let mut doc = Document::new();
        let popup = doc.region(Region::Popup);
        doc.toggle_class(popup, "cover_hidden", true);
        doc.toggle_class(popup, "cover_hidden", true);
        assert_eq!(doc.to_html().matches("cover_hidden").count(), 1);

        doc.toggle_class(popup, "cover_hidden", false);
        assert!(!doc.has_class(popup, "cover_hidden"));
    }

    #[test]
    fn inputs_render_without_closing_tag() {
        let doc = Document::new();
        let html = doc.to_html();
        assert!(html.contains(r#"name="comment""#));
        assert!(!html.contains("</input>"));
    }
}
