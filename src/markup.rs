//! Minimal tree interface the listing extractor walks.

use crate::error::{Error, Result};
use scraper::{ElementRef, Selector};

/// A node of a parsed markup tree.
///
/// Lookups search descendants only, never the node itself. `class` matches
/// when the element carries that class among others.
pub trait MarkupNode: Sized {
    fn find_first(&self, tag: &str, class: Option<&str>) -> Result<Option<Self>>;

    fn find_all(&self, tag: &str, class: Option<&str>) -> Result<Vec<Self>>;

    /// Concatenated text of the node and its descendants.
    fn text(&self) -> String;

    fn attr(&self, name: &str) -> Option<String>;
}

fn selector(tag: &str, class: Option<&str>) -> Result<Selector> {
    let css = match class {
        Some(class) => format!("{tag}.{class}"),
        None => tag.to_string(),
    };
    Selector::parse(&css).map_err(|e| Error::Selector {
        reason: e.to_string(),
        selector: css.clone(),
    })
}

impl<'a> MarkupNode for ElementRef<'a> {
    fn find_first(&self, tag: &str, class: Option<&str>) -> Result<Option<Self>> {
        let sel = selector(tag, class)?;
        Ok(self.select(&sel).next())
    }

    fn find_all(&self, tag: &str, class: Option<&str>) -> Result<Vec<Self>> {
        let sel = selector(tag, class)?;
        Ok(self.select(&sel).collect())
    }

    fn text(&self) -> String {
        ElementRef::text(self).collect()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    const PAGE: &str = r#"<html><body>
        <div class="box filmContainer"><div class="titolo">Uno</div></div>
        <div class="filmContainer"><div class="titolo">Due</div><img src="./a.jpg"></div>
        <div class="other">Tre</div>
    </body></html>"#;

    #[test]
    fn finds_by_tag_and_class() {
        let doc = Html::parse_document(PAGE);
        let root = doc.root_element();

        let films = root.find_all("div", Some("filmContainer")).unwrap();
        assert_eq!(films.len(), 2);

        let title = films[1].find_first("div", Some("titolo")).unwrap().unwrap();
        assert_eq!(MarkupNode::text(&title), "Due");
        assert!(root.find_first("span", None).unwrap().is_none());
    }

    #[test]
    fn reads_attributes() {
        let doc = Html::parse_document(PAGE);
        let img = doc.root_element().find_first("img", None).unwrap().unwrap();
        assert_eq!(img.attr("src").as_deref(), Some("./a.jpg"));
        assert_eq!(img.attr("alt"), None);
    }

    #[test]
    fn lookups_skip_the_node_itself() {
        let doc = Html::parse_document(PAGE);
        let root = doc.root_element();
        let other = root.find_first("div", Some("other")).unwrap().unwrap();
        assert!(other.find_first("div", Some("other")).unwrap().is_none());
    }

    #[test]
    fn bad_class_is_a_selector_error() {
        let doc = Html::parse_document(PAGE);
        let err = doc.root_element().find_all("div", Some("")).unwrap_err();
        assert!(matches!(err, Error::Selector { .. }));
    }
}
