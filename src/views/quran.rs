use crate::models::{SurahDetail, SurahSummary};
use crate::views::components::share_action;
use crate::views::layout::{PageContext, page};
use maud::{Markup, PreEscaped, html};

pub fn surah_list_page(ctx: &PageContext, surahs: &[SurahSummary]) -> Markup {
    let content = html! {
        h1 { "Al-Qur'an" }
        table {
            thead {
                tr { th { "No" } th { "Surah" } th { "Arti" } th { "Ayat" } th { "Tempat turun" } }
            }
            tbody {
                @for surah in surahs {
                    tr {
                        td { (surah.number) }
                        td {
                            a href={ "/quran/" (surah.number) } { (surah.latin_name) }
                            " "
                            span lang="ar" { (surah.name) }
                        }
                        td { (surah.translation) }
                        td { (surah.ayah_count) }
                        td { (surah.revelation_place) }
                    }
                }
            }
        }
    };
    page(ctx, "Al-Qur'an", content)
}

pub fn surah_page(ctx: &PageContext, surah: &SurahDetail) -> Markup {
    let title = format!("Surah {}", surah.summary.latin_name);
    let content = html! {
        h1 { (title) " " span lang="ar" { (surah.summary.name) } }
        p.muted {
            (surah.summary.translation) " · " (surah.summary.ayah_count) " ayat · "
            (surah.summary.revelation_place)
        }
        @if let Some(audio) = &surah.audio_url {
            audio controls preload="none" src=(audio) {}
        }
        @if !surah.description.is_empty() {
            // upstream descriptions carry simple inline markup such as <i>
            details {
                summary { "Tentang surah ini" }
                p { (PreEscaped(sanitize_inline(&surah.description))) }
            }
        }
        @for verse in &surah.verses {
            section.card id={ "ayat-" (verse.number) } {
                div.card-body {
                    p.arabic lang="ar" { (verse.arabic) " ﴿" (verse.number) "﴾" }
                    p.muted { em { (verse.latin) } }
                    p { (verse.number) ". " (verse.translation) }
                }
            }
        }
        nav.share aria-label="Surah" {
            @if let Some(prev) = surah.previous {
                a href={ "/quran/" (prev) } { "← Surah sebelumnya" }
            }
            a href="/quran" { "Daftar surah" }
            @if let Some(next) = surah.next {
                a href={ "/quran/" (next) } { "Surah berikutnya →" }
            }
        }
        (share_action(&ctx.absolute_url(), &title))
    };
    page(ctx, &title, content)
}

/// Escapes everything except a small set of formatting tags.
fn sanitize_inline(raw: &str) -> String {
    const ALLOWED: &[&str] = &["i", "b", "em", "strong", "br"];
    let escaped = maud::html! { (raw) }.into_string();
    let mut out = escaped;
    for tag in ALLOWED {
        out = out
            .replace(&format!("&lt;{tag}&gt;"), &format!("<{tag}>"))
            .replace(&format!("&lt;/{tag}&gt;"), &format!("</{tag}>"));
    }
    out.replace("&lt;br/&gt;", "<br>").replace("&lt;br /&gt;", "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_inline_keeps_only_formatting() {
        let out = sanitize_inline("Surah <i>Makkiyyah</i><br><script>alert(1)</script>");
        assert_eq!(
            out,
            "Surah <i>Makkiyyah</i><br>&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }
}
