use crate::entities::menu_item_entity;
use crate::utils::SessionUser;
use crate::views::icons::Icon;
use maud::{DOCTYPE, Markup, PreEscaped, html};

const STYLESHEET: &str = r#"
:root{--green:#0f766e;--ink:#1f2937;--muted:#6b7280;--bg:#f8faf9;--card:#fff}
*{box-sizing:border-box}
body{margin:0;font-family:system-ui,-apple-system,"Segoe UI",sans-serif;color:var(--ink);background:var(--bg)}
a{color:var(--green)}
.site-header{display:flex;justify-content:space-between;align-items:center;padding:.75rem 1rem;background:var(--green);color:#fff}
.site-header a{color:#fff;text-decoration:none}
.brand{font-weight:700;display:flex;gap:.5rem;align-items:center}
.site-nav ul{list-style:none;margin:0;padding:0;display:flex;gap:1rem;flex-wrap:wrap}
.site-nav li.current a{text-decoration:underline}
.nav-empty{opacity:.8;font-size:.9rem}
main{max-width:960px;margin:0 auto;padding:1rem}
.marquee{overflow:hidden;white-space:nowrap;background:#fef3c7;padding:.4rem 0}
.marquee span{display:inline-block;padding-left:100%;animation:marquee linear infinite}
@keyframes marquee{from{transform:translateX(0)}to{transform:translateX(-100%)}}
.quick-actions{display:grid;grid-template-columns:repeat(auto-fill,minmax(96px,1fr));gap:.75rem}
.quick-action{display:flex;flex-direction:column;align-items:center;gap:.35rem;padding:.75rem;border-radius:12px;background:var(--card);text-decoration:none;color:var(--ink);font-size:.85rem;text-align:center}
.quick-action .icon-badge{display:flex;align-items:center;justify-content:center;width:44px;height:44px;border-radius:50%;color:#fff}
.cards{display:grid;grid-template-columns:repeat(auto-fill,minmax(260px,1fr));gap:1rem}
.card{background:var(--card);border-radius:12px;overflow:hidden;box-shadow:0 1px 3px rgba(0,0,0,.08)}
.card img{width:100%;height:150px;object-fit:cover}
.card-body{padding:.75rem 1rem}
.progress{height:8px;background:#e5e7eb;border-radius:4px;overflow:hidden}
.progress-bar{height:100%;background:var(--green)}
.muted{color:var(--muted);font-size:.9rem}
.share{display:flex;gap:.5rem;flex-wrap:wrap;margin:1rem 0}
.share a,.share button{padding:.35rem .75rem;border-radius:999px;border:1px solid var(--green);background:#fff;color:var(--green);cursor:pointer;text-decoration:none;font-size:.85rem}
form.stack{display:flex;flex-direction:column;gap:.6rem;max-width:420px}
form.stack input,form.stack select,form.stack textarea{padding:.5rem;border:1px solid #d1d5db;border-radius:8px;font:inherit}
button.primary{background:var(--green);color:#fff;border:0;border-radius:8px;padding:.6rem 1rem;font:inherit;cursor:pointer}
.notice{padding:.6rem 1rem;border-radius:8px;background:#ecfdf5;margin-bottom:1rem}
.notice.error{background:#fef2f2;color:#991b1b}
table{width:100%;border-collapse:collapse}
th,td{text-align:left;padding:.4rem;border-bottom:1px solid #e5e7eb;font-size:.9rem}
.arabic{font-size:1.6rem;text-align:right;direction:rtl;line-height:2.4}
footer{text-align:center;padding:2rem 1rem;color:var(--muted);font-size:.85rem}
"#;

/// Everything the shared chrome needs to know about the current request.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub app_name: String,
    pub base_url: String,
    /// Request path, used to highlight the current menu entry and build share links
    pub path: String,
    pub user: Option<SessionUser>,
    /// Active menu items in display order
    pub menu: Vec<menu_item_entity::Model>,
}

impl PageContext {
    pub fn absolute_url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }
}

pub fn render_nav(items: &[menu_item_entity::Model], current_path: &str) -> Markup {
    html! {
        nav.site-nav {
            @if items.is_empty() {
                span.nav-empty { "Menu belum tersedia" }
            } @else {
                ul {
                    @for item in items {
                        @let is_current = item.href == current_path;
                        li class=[is_current.then_some("current")] {
                            a href=(item.href) { (item.label) }
                        }
                    }
                }
            }
        }
    }
}

fn account_links(user: Option<&SessionUser>) -> Markup {
    html! {
        div.account {
            @match user {
                Some(u) => {
                    @if u.is_admin() {
                        a href="/admin" { "Admin" }
                        " · "
                    }
                    a href="/profile" { (u.name) }
                    " · "
                    a href="/logout" { "Keluar" }
                }
                None => {
                    a href="/login" { "Masuk" }
                    " · "
                    a href="/register" { "Daftar" }
                }
            }
        }
    }
}

pub fn page(ctx: &PageContext, title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="id" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | " (ctx.app_name) }
                meta property="og:title" content=(title);
                meta property="og:url" content=(ctx.absolute_url());
                style { (PreEscaped(STYLESHEET)) }
            }
            body {
                header.site-header {
                    a.brand href="/" { (Icon::Mosque.render()) (ctx.app_name) }
                    (account_links(ctx.user.as_ref()))
                }
                div.nav-bar { (render_nav(&ctx.menu, &ctx.path)) }
                main { (content) }
                footer {
                    a href="/prayer-times" { "Jadwal Sholat" } " · "
                    a href="/zakat" { "Kalkulator Zakat" } " · "
                    a href="/quran" { "Al-Qur'an" } " · "
                    a href="/sitemap.xml" { "Sitemap" }
                    p { "© " (ctx.app_name) }
                }
            }
        }
    }
}

pub fn notice(message: Option<&str>, is_error: bool) -> Markup {
    html! {
        @if let Some(message) = message.filter(|m| !m.is_empty()) {
            div.notice.error[is_error] role="status" { (message) }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::entities::MenuType;
    use chrono::Utc;

    pub fn menu_item(id: i64, label: &str, href: &str, order: i32) -> menu_item_entity::Model {
        let now = Utc::now();
        menu_item_entity::Model {
            id,
            label: label.to_string(),
            icon: "mosque".to_string(),
            color: "#0f766e".to_string(),
            href: href.to_string(),
            sort_order: order,
            is_active: true,
            menu_type: MenuType::Link,
            slug: None,
            template: None,
            content: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn context(menu: Vec<menu_item_entity::Model>) -> PageContext {
        PageContext {
            app_name: "Masjid Al-Ikhlas".to_string(),
            base_url: "https://masjid.example".to_string(),
            path: "/".to_string(),
            user: None,
            menu,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_nav_fallback_without_menu_items() {
        let html = render_nav(&[], "/").into_string();
        assert!(html.contains("Menu belum tersedia"));
        assert!(!html.contains("<ul>"));
    }

    #[test]
    fn test_nav_marks_current_item() {
        let items = vec![
            menu_item(1, "Zakat", "/zakat", 0),
            menu_item(2, "Berita", "/news", 1),
        ];
        let html = render_nav(&items, "/news").into_string();
        assert!(html.contains(r#"<li class="current"><a href="/news">"#));
    }

    #[test]
    fn test_page_includes_doctype_and_title() {
        let html = page(&context(vec![]), "Beranda", html! { p { "isi" } }).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Beranda | Masjid Al-Ikhlas</title>"));
        assert!(html.contains(r#"href="/login""#));
    }
}
