//! Projections of the carousel sequence into what the pages display.
//!
//! Captions are escaped here and only here; the store always holds the raw
//! operator input.

mod pages;

pub use pages::{admin_page, login_page, public_page};

use serde::Serialize;

use crate::storage::models::{CarouselItem, MediaKind};

/// Escape the five HTML-significant characters. `None` renders as `""`.
pub fn sanitize_caption<'a>(raw: impl Into<Option<&'a str>>) -> String {
    let Some(raw) = raw.into() else {
        return String::new();
    };
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slide {
    pub url: String,
    pub kind: MediaKind,
    /// HTML-escaped caption
    pub caption: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Carousel {
    pub slides: Vec<Slide>,
}

impl Carousel {
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Index after `current`, wrapping to the first slide.
    pub fn next(&self, current: usize) -> usize {
        match self.len() {
            0 => 0,
            len => (current % len + 1) % len,
        }
    }

    /// Index before `current`, wrapping to the last slide.
    pub fn prev(&self, current: usize) -> usize {
        match self.len() {
            0 => 0,
            len => (current % len + len - 1) % len,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PublicView {
    Empty,
    Carousel(Carousel),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminRow {
    pub position: usize,
    pub url: String,
    pub kind: MediaKind,
    /// HTML-escaped caption
    pub caption: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminView {
    pub rows: Vec<AdminRow>,
}

fn slide(index: usize, item: &CarouselItem) -> Slide {
    Slide {
        url: item.url.clone(),
        kind: item.media_kind(),
        caption: sanitize_caption(item.caption.as_str()),
        active: index == 0,
    }
}

pub fn render_public(sequence: &[CarouselItem]) -> PublicView {
    if sequence.is_empty() {
        return PublicView::Empty;
    }
    PublicView::Carousel(Carousel {
        slides: sequence
            .iter()
            .enumerate()
            .map(|(i, item)| slide(i, item))
            .collect(),
    })
}

pub fn render_admin(sequence: &[CarouselItem]) -> AdminView {
    AdminView {
        rows: sequence
            .iter()
            .enumerate()
            .map(|(position, item)| {
                let Slide {
                    url,
                    kind,
                    caption,
                    active,
                } = slide(position, item);
                AdminRow {
                    position,
                    url,
                    kind,
                    caption,
                    active,
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_caption() {
        assert_eq!(
            sanitize_caption("<b>&'\""),
            "&lt;b&gt;&amp;&#39;&quot;"
        );
        assert_eq!(sanitize_caption(""), "");
        assert_eq!(sanitize_caption(None::<&str>), "");
        assert_eq!(sanitize_caption("Olá café"), "Olá café");
    }

    #[test]
    fn test_render_public_empty() {
        assert_eq!(render_public(&[]), PublicView::Empty);
    }

    #[test]
    fn test_render_public_marks_first_active() {
        let items = vec![
            CarouselItem::new("/uploads/a.png", "image/png", "<a>"),
            CarouselItem::new("/uploads/b.mp4", "video/mp4", ""),
        ];
        let PublicView::Carousel(carousel) = render_public(&items) else {
            panic!("expected a carousel");
        };
        assert_eq!(carousel.len(), 2);
        assert!(carousel.slides[0].active);
        assert!(!carousel.slides[1].active);
        assert_eq!(carousel.slides[0].kind, MediaKind::Image);
        assert_eq!(carousel.slides[1].kind, MediaKind::Video);
        assert_eq!(carousel.slides[0].caption, "&lt;a&gt;");
    }

    #[test]
    fn test_cyclic_navigation() {
        let items: Vec<CarouselItem> = (0..3)
            .map(|n| CarouselItem::new(format!("/uploads/{n}.png"), "image/png", ""))
            .collect();
        let PublicView::Carousel(carousel) = render_public(&items) else {
            panic!("expected a carousel");
        };
        assert_eq!(carousel.next(0), 1);
        assert_eq!(carousel.next(2), 0);
        assert_eq!(carousel.prev(0), 2);
        assert_eq!(carousel.prev(1), 0);
    }

    #[test]
    fn test_render_admin_positions() {
        let items = vec![
            CarouselItem::new("/uploads/a.png", "image/png", "one"),
            CarouselItem::new("/uploads/a.png", "image/png", "two"),
        ];
        let view = render_admin(&items);
        let positions: Vec<usize> = view.rows.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![0, 1]);
        assert_eq!(view.rows[1].caption, "two");
    }
}
