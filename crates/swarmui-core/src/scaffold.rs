// ── Page scaffold setup ──
//
// The page ships a `header` (holding an `aside.hideable` sidebar) and a
// `footer`. The shell augments that scaffold once; it never creates one.
// Every element the shell adds carries a `data-shell` marker so later
// lookups don't depend on page content.

use std::time::Duration;

use maud::Markup;

use crate::dom::{Element, Node};

const SHELL_ATTR: &str = "data-shell";
const HIDEABLE: &str = "hideable";
const SHOWN: &str = "shown";
const ACTIVE: &str = "active";

/// `data-action` value on the sidebar toggle button.
pub const TOGGLE_ACTION: &str = "toggle-sidebar";

/// Elements the shell inserts into the scaffold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Toggle,
    Busy,
    Dynamic,
    Toast,
}

impl Part {
    pub fn marker(self) -> &'static str {
        match self {
            Part::Toggle => "toggle",
            Part::Busy => "busy",
            Part::Dynamic => "dynamic",
            Part::Toast => "toast",
        }
    }
}

fn is_header(e: &Element) -> bool {
    e.tag() == "header"
}

fn is_footer(e: &Element) -> bool {
    e.tag() == "footer"
}

fn is_sidebar(e: &Element) -> bool {
    e.tag() == "aside"
}

fn is_hideable_sidebar(e: &Element) -> bool {
    is_sidebar(e) && e.has_class(HIDEABLE)
}

fn is_part(part: Part) -> impl Fn(&Element) -> bool {
    move |e: &Element| e.attr(SHELL_ATTR) == Some(part.marker())
}

fn header_of(host: &Element) -> Option<&Element> {
    host.child_elements().find(|e| is_header(e))
}

/// Whether `host` has a header child holding a hideable sidebar, and a
/// footer child.
pub fn has_scaffold(host: &Element) -> bool {
    let Some(header) = header_of(host) else {
        return false;
    };
    header.child_elements().any(is_hideable_sidebar) && host.child_elements().any(is_footer)
}

/// Whether [`install`] has already augmented `host`.
pub fn is_installed(host: &Element) -> bool {
    host.find(&is_part(Part::Dynamic)).is_some()
}

/// Augment the scaffold in place. Returns `false` (leaving `host`
/// untouched) when the scaffold is incomplete.
pub fn install(host: &mut Element, feedback_url: &str) -> bool {
    if !has_scaffold(host) {
        return false;
    }
    if is_installed(host) {
        return true;
    }

    let Some(header) = host.child_mut(is_header) else {
        return false;
    };
    header.prepend_element(toggle_button());
    let Some(sidebar_idx) = header.position(is_hideable_sidebar) else {
        return false;
    };
    header.insert(sidebar_idx, busy_indicator());
    header.append(Element::new("span").with_class("grow"));
    header.append(dynamic_region());

    let Some(footer) = host.child_mut(is_footer) else {
        return false;
    };
    footer.append(error_toast());
    footer.append(feedback_link(feedback_url));
    true
}

/// Toggle the `shown` class on the header's hideable sidebar. Returns the
/// new state, or `None` when the scaffold was never installed.
pub fn toggle_sidebar(host: &mut Element) -> Option<bool> {
    if !is_installed(host) {
        return None;
    }
    let sidebar = host.child_mut(is_header)?.child_mut(is_hideable_sidebar)?;
    Some(sidebar.toggle_class(SHOWN))
}

/// Set the busy indicator's `active` flag. Returns `false` when no
/// indicator is mounted.
pub fn set_indicator(host: &mut Element, active: bool) -> bool {
    match host.find_mut(&is_part(Part::Busy)) {
        Some(spinner) => {
            spinner.set_flag(ACTIVE, active);
            true
        }
        None => false,
    }
}

/// Whether the busy indicator is mounted and active.
pub fn indicator_active(host: &Element) -> bool {
    host.find(&is_part(Part::Busy))
        .is_some_and(|spinner| spinner.has_attr(ACTIVE))
}

/// Replace the dynamic region's content. Returns `false` when the region
/// is not mounted.
pub fn set_dynamic_region(host: &mut Element, markup: Markup) -> bool {
    match host.find_mut(&is_part(Part::Dynamic)) {
        Some(region) => {
            region.set_children(vec![Node::from(markup)]);
            true
        }
        None => false,
    }
}

/// The dynamic region, if mounted.
pub fn dynamic_region_of(host: &Element) -> Option<&Element> {
    host.find(&is_part(Part::Dynamic))
}

/// Hand a message to the error toast. Returns `false` when no toast slot
/// is mounted.
pub fn show_toast(host: &mut Element, message: &str, duration: Duration) -> bool {
    match host.find_mut(&is_part(Part::Toast)) {
        Some(toast) => {
            toast.set_attr("message", message);
            toast.set_attr("duration", duration.as_millis().to_string());
            true
        }
        None => false,
    }
}

// ── Inserted elements ────────────────────────────────────────────────

fn toggle_button() -> Element {
    Element::new("button")
        .with_class("toggle-button")
        .with_attr(SHELL_ATTR, Part::Toggle.marker())
        .with_attr("data-action", TOGGLE_ACTION)
        .with_attr("aria-label", "Toggle menu")
        .with_child(Element::new("menu-icon-sk"))
}

fn busy_indicator() -> Element {
    Element::new("spinner-sk").with_attr(SHELL_ATTR, Part::Busy.marker())
}

fn dynamic_region() -> Element {
    Element::new("div")
        .with_class("right")
        .with_attr(SHELL_ATTR, Part::Dynamic.marker())
}

fn error_toast() -> Element {
    Element::new("error-toast-sk").with_attr(SHELL_ATTR, Part::Toast.marker())
}

fn feedback_link(url: &str) -> Element {
    Element::new("a")
        .with_class("feedback")
        .with_attr("href", url)
        .with_attr("target", "_blank")
        .with_attr("rel", "noopener")
        .with_text("File a bug")
}

/// The scaffold a standalone console page ships with: a title, a hideable
/// navigation sidebar, a main area and an empty footer.
pub fn default_page(title: &str) -> Element {
    Element::new("swarming-app")
        .with_child(
            Element::new("header")
                .with_child(Element::new("h1").with_text(title))
                .with_child(
                    Element::new("aside")
                        .with_class(HIDEABLE)
                        .with_child(Element::new("a").with_attr("href", "/").with_text("Home"))
                        .with_child(Element::new("a").with_attr("href", "/botlist").with_text("Bots"))
                        .with_child(
                            Element::new("a").with_attr("href", "/tasklist").with_text("Tasks"),
                        ),
                ),
        )
        .with_child(Element::new("main"))
        .with_child(Element::new("footer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use maud::html;
    use pretty_assertions::assert_eq;

    fn header_tags(host: &Element) -> Vec<String> {
        header_of(host)
            .map(|h| h.child_elements().map(|e| e.tag().to_owned()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn install_augments_scaffold() {
        let mut host = default_page("Swarming");
        assert!(install(&mut host, "https://bugs/new"));

        assert_eq!(
            header_tags(&host),
            ["button", "h1", "spinner-sk", "aside", "span", "div"]
        );

        let footer = host.find(&is_footer).expect("footer");
        let footer_tags: Vec<&str> = footer.child_elements().map(Element::tag).collect();
        assert_eq!(footer_tags, ["error-toast-sk", "a"]);
        let link = footer.find(&|e: &Element| e.has_class("feedback")).expect("feedback");
        assert_eq!(link.attr("href"), Some("https://bugs/new"));

        let toggle = host.find(&is_part(Part::Toggle)).expect("toggle");
        assert_eq!(toggle.attr("data-action"), Some(TOGGLE_ACTION));
        assert!(dynamic_region_of(&host).is_some_and(|r| r.has_class("right")));
    }

    #[test]
    fn install_is_idempotent() {
        let mut host = default_page("Swarming");
        assert!(install(&mut host, "u"));
        let once = host.clone();
        assert!(install(&mut host, "u"));
        assert_eq!(host, once);
    }

    #[test]
    fn missing_pieces_skip_setup() {
        let no_footer = Element::new("swarming-app").with_child(
            Element::new("header").with_child(Element::new("aside").with_class(HIDEABLE)),
        );
        let not_hideable = Element::new("swarming-app")
            .with_child(Element::new("header").with_child(Element::new("aside")))
            .with_child(Element::new("footer"));
        let no_header = Element::new("swarming-app").with_child(Element::new("footer"));

        for mut host in [no_footer, not_hideable, no_header] {
            let before = host.clone();
            assert!(!install(&mut host, "u"));
            assert_eq!(host, before);
            assert!(!set_indicator(&mut host, true));
            assert!(!set_dynamic_region(&mut host, html! { "x" }));
            assert!(!show_toast(&mut host, "m", Duration::from_secs(1)));
        }
    }

    #[test]
    fn toggle_flips_shown_class() {
        let mut host = default_page("Swarming");
        install(&mut host, "u");
        assert_eq!(toggle_sidebar(&mut host), Some(true));
        assert!(host.find(&is_sidebar).is_some_and(|s| s.has_class(SHOWN)));
        assert_eq!(toggle_sidebar(&mut host), Some(false));

        let mut bare = Element::new("div");
        assert_eq!(toggle_sidebar(&mut bare), None);
    }

    #[test]
    fn toggle_needs_installed_scaffold() {
        let mut no_footer = Element::new("swarming-app").with_child(
            Element::new("header").with_child(Element::new("aside").with_class(HIDEABLE)),
        );
        let before = no_footer.clone();
        assert!(!install(&mut no_footer, "u"));
        assert_eq!(toggle_sidebar(&mut no_footer), None);
        assert_eq!(no_footer, before);
    }

    #[test]
    fn toggle_targets_hideable_sidebar() {
        let mut host = default_page("Swarming");
        host.child_mut(is_header)
            .expect("header")
            .prepend_element(Element::new("aside").with_class("notes"));
        assert!(install(&mut host, "u"));

        assert_eq!(toggle_sidebar(&mut host), Some(true));
        let header = header_of(&host).expect("header");
        let shown: Vec<bool> = header
            .child_elements()
            .filter(|e| is_sidebar(e))
            .map(|e| e.has_class(SHOWN))
            .collect();
        assert_eq!(shown, [false, true]);
    }

    #[test]
    fn nested_header_does_not_hide_scaffold() {
        let mut host = Element::new("swarming-app")
            .with_child(Element::new("nav").with_child(Element::new("header")))
            .with_child(
                Element::new("header").with_child(Element::new("aside").with_class(HIDEABLE)),
            )
            .with_child(Element::new("footer"));
        assert!(has_scaffold(&host));
        assert!(install(&mut host, "u"));

        let nav = host.child_elements().next().expect("nav");
        assert_eq!(nav.find(&is_header).map(|h| h.children().len()), Some(0));
        assert_eq!(
            header_tags(&host),
            ["button", "spinner-sk", "aside", "span", "div"]
        );
    }

    #[test]
    fn nested_footer_is_not_a_scaffold_footer() {
        let host = Element::new("swarming-app")
            .with_child(
                Element::new("header")
                    .with_child(Element::new("aside").with_class(HIDEABLE))
                    .with_child(Element::new("footer")),
            );
        assert!(!has_scaffold(&host));
    }

    #[test]
    fn indicator_and_region_updates() {
        let mut host = default_page("Swarming");
        install(&mut host, "u");

        assert!(set_indicator(&mut host, true));
        assert!(indicator_active(&host));
        assert!(set_indicator(&mut host, false));
        assert!(!indicator_active(&host));

        assert!(set_dynamic_region(&mut host, html! { b { "v1" } }));
        let region = dynamic_region_of(&host).expect("region");
        assert_eq!(region.children(), [Node::Markup("<b>v1</b>".into())]);

        assert!(show_toast(&mut host, "oops", Duration::from_millis(1500)));
        let toast = host.find(&is_part(Part::Toast)).expect("toast");
        assert_eq!(toast.attr("message"), Some("oops"));
        assert_eq!(toast.attr("duration"), Some("1500"));
    }
}
