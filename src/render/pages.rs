use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::{AdminView, PublicView, Slide};
use crate::storage::models::{MediaKind, MAX_CAPTION_CHARS};

const PUBLIC_CSS: &str = r#"
body{font-family:sans-serif;margin:0;background:#fff;}
.carousel{max-width:500px;margin:30px auto;box-shadow:0 0 12px #2222;padding:12px;border-radius:12px;background:#eee;}
.carousel-item{display:none;flex-direction:column;align-items:center;}
.carousel-item.active{display:flex;}
img,video{max-width:100%;max-height:320px;border-radius:6px;}
.caption{margin-top:10px;background:rgba(0,0,0,0.6);color:#fff;padding:6px 12px;border-radius:8px;}
.controls{margin:10px;text-align:center;}
.controls button{background:#333;color:#fff;border:none;padding:7px 13px;margin:0 5px;border-radius:6px;cursor:pointer;}
"#;

const ADMIN_CSS: &str = r#"
body{font-family:sans-serif;background:#f0f0f0;}
.wrap{max-width:550px;margin:40px auto;padding:26px;background:#fff;border-radius:14px;box-shadow:0 1px 18px #4444;}
h2{font-size:20px;}
.item{display:flex;align-items:center;padding:7px 0;}
.item img,.item video{max-width:50px;max-height:35px;margin-right:10px;}
.item input[type=text]{flex:1 1 60%;padding:2px 8px;}
.item button{margin-left:4px;}
.error{color:#b00;}
"#;

// Cyclic navigation: indices wrap around the slide count
const PUBLIC_JS: &str = r#"
let idx = 0;
const items = document.querySelectorAll('.carousel-item');
function show(n) {
  if (!items.length) return;
  items[idx].classList.remove('active');
  idx = (n + items.length) % items.length;
  items[idx].classList.add('active');
}
function prev() { show(idx - 1); }
function next() { show(idx + 1); }
"#;

const ADMIN_JS: &str = r#"
async function call(path, body) {
  const res = await fetch(path, {
    method: 'POST',
    headers: {'Content-Type': 'application/json'},
    body: JSON.stringify(body)
  });
  const json = await res.json().catch(() => ({}));
  if (!res.ok) {
    alert((json.data && json.data.message) || json.message || 'Request failed');
  }
  location.reload();
}
function move(i, d) { call('/admin/move', {i, d}); }
function remove(i) {
  if (!confirm('Remove this item?')) return;
  call('/admin/remove', {i});
}
function updateCaption(i, caption) { call('/admin/caption', {i, caption}); }
document.getElementById('upload').addEventListener('submit', async (e) => {
  e.preventDefault();
  const res = await fetch('/admin/upload', {method: 'POST', body: new FormData(e.target)});
  const json = await res.json().catch(() => ({}));
  if (!res.ok) {
    alert((json.data && json.data.message) || json.message || 'Upload failed');
    return;
  }
  location.reload();
});
"#;

fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

fn media(url: &str, kind: MediaKind, public: bool) -> Markup {
    match (kind, public) {
        (MediaKind::Image, true) => html! { img src=(url) alt="Carousel image"; },
        (MediaKind::Image, false) => html! { img src=(url); },
        (MediaKind::Video, true) => html! { video src=(url) controls {} },
        (MediaKind::Video, false) => html! { video src=(url) {} },
    }
}

fn slide(slide: &Slide) -> Markup {
    html! {
        div.carousel-item.active[slide.active] {
            (media(&slide.url, slide.kind, true))
            // Caption was escaped by sanitize_caption
            div.caption { (PreEscaped(&slide.caption)) }
        }
    }
}

/// The public carousel page.
pub fn public_page(view: &PublicView) -> Markup {
    let content = html! {
        div.carousel {
            @match view {
                PublicView::Empty => {
                    p.empty { "No items in the carousel yet." }
                }
                PublicView::Carousel(carousel) => {
                    @for s in &carousel.slides {
                        (slide(s))
                    }
                    div.controls {
                        button onclick="prev()" { "Previous" }
                        button onclick="next()" { "Next" }
                    }
                }
            }
        }
        script { (PreEscaped(PUBLIC_JS)) }
    };
    base_document("Carousel", PUBLIC_CSS, content)
}

/// The operator page: upload form plus one editable row per item.
pub fn admin_page(view: &AdminView) -> Markup {
    let content = html! {
        div.wrap {
            h2 { "Carousel administration" }
            form id="upload" action="/admin/upload" method="post" enctype="multipart/form-data" {
                input type="file" name="media" accept="image/*,video/*" required;
                input type="text" name="caption" maxlength=(MAX_CAPTION_CHARS) placeholder="Caption";
                button { "Upload" }
            }
            p { "Current items:" }
            @for row in &view.rows {
                div.item data-position=(row.position) {
                    (media(&row.url, row.kind, false))
                    input type="text" maxlength=(MAX_CAPTION_CHARS)
                        value=(PreEscaped(&row.caption))
                        onchange={ "updateCaption(" (row.position) ",this.value)" };
                    button onclick={ "move(" (row.position) ",-1)" } { "↑" }
                    button onclick={ "move(" (row.position) ",1)" } { "↓" }
                    button style="color:red;" onclick={ "remove(" (row.position) ")" } { "Remove" }
                }
            }
            form action="/admin/logout" method="post" style="margin-top:20px;" {
                button { "Logout" }
            }
        }
        script { (PreEscaped(ADMIN_JS)) }
    };
    base_document("Carousel admin", ADMIN_CSS, content)
}

/// Login form shown on `/admin` without a session.
pub fn login_page(error: Option<&str>) -> Markup {
    let content = html! {
        div.wrap {
            @if let Some(message) = error {
                p.error { (message) }
            }
            form method="post" action="/admin" {
                input type="text" name="username" placeholder="Username" required autofocus;
                input type="password" name="password" placeholder="Password" required;
                button { "Sign in" }
            }
        }
    };
    base_document("Carousel admin", ADMIN_CSS, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{render_admin, render_public};
    use crate::storage::models::CarouselItem;

    #[test]
    fn test_public_page_empty_state() {
        let html = public_page(&render_public(&[])).into_string();
        assert!(html.contains("No items in the carousel yet."));
        assert!(!html.contains(r#"class="carousel-item"#));
    }

    #[test]
    fn test_public_page_escapes_caption_once() {
        let items = vec![CarouselItem::new(
            "/uploads/1-a.png",
            "image/png",
            "<script>alert(1)</script>",
        )];
        let html = public_page(&render_public(&items)).into_string();
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("&amp;lt;"));
        assert!(html.contains(r#"class="carousel-item active""#));
        assert!(html.contains(r#"<img src="/uploads/1-a.png""#));
    }

    #[test]
    fn test_public_page_video_markup() {
        let items = vec![
            CarouselItem::new("/uploads/1-a.png", "image/png", ""),
            CarouselItem::new("/uploads/2-b.mp4", "video/mp4", ""),
        ];
        let html = public_page(&render_public(&items)).into_string();
        assert!(html.contains(r#"<video src="/uploads/2-b.mp4" controls>"#));
        assert_eq!(html.matches("carousel-item active").count(), 1);
    }

    #[test]
    fn test_admin_page_wires_positions() {
        let items = vec![
            CarouselItem::new("/uploads/1-a.png", "image/png", "it's"),
            CarouselItem::new("/uploads/2-b.png", "image/png", "b"),
        ];
        let html = admin_page(&render_admin(&items)).into_string();
        assert!(html.contains("move(1,-1)"));
        assert!(html.contains("remove(0)"));
        assert!(html.contains(r#"value="it&#39;s""#));
    }

    #[test]
    fn test_login_page_error() {
        let html = login_page(Some("Invalid username or password")).into_string();
        assert!(html.contains("Invalid username or password"));
        assert!(login_page(None).into_string().contains(r#"name="password""#));
    }
}
