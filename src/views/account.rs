use crate::entities::TransactionStatus;
use crate::models::{TransactionResponse, UserResponse};
use crate::utils::money::format_rupiah;
use crate::views::icons::Icon;
use crate::views::layout::{PageContext, notice, page};
use maud::{Markup, html};

/// Messages shown above an account form.
#[derive(Debug, Default, Clone)]
pub struct FormNotice {
    pub info: Option<String>,
    pub error: Option<String>,
}

impl FormNotice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            info: None,
            error: Some(message.into()),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            info: Some(message.into()),
            error: None,
        }
    }

    fn render(&self) -> Markup {
        html! {
            (notice(self.info.as_deref(), false))
            (notice(self.error.as_deref(), true))
        }
    }
}

fn google_button(intent: &str, label: &str) -> Markup {
    html! {
        p {
            a.share href={ "/api/auth/google?intent=" (intent) } { (Icon::Link.render()) " " (label) }
        }
    }
}

pub fn login_page(ctx: &PageContext, email: &str, messages: &FormNotice) -> Markup {
    let content = html! {
        h1 { "Masuk" }
        (messages.render())
        form.stack method="post" action="/login" {
            label { "Email" input type="email" name="email" value=(email) required; }
            label { "Kata sandi" input type="password" name="password" required; }
            button.primary type="submit" { "Masuk" }
        }
        (google_button("login", "Masuk dengan Google"))
        p.muted { "Belum punya akun? " a href="/register" { "Daftar" } }
    };
    page(ctx, "Masuk", content)
}

pub fn register_page(ctx: &PageContext, name: &str, email: &str, messages: &FormNotice) -> Markup {
    let content = html! {
        h1 { "Daftar" }
        (messages.render())
        form.stack method="post" action="/register" {
            label { "Nama" input type="text" name="name" value=(name) required; }
            label { "Email" input type="email" name="email" value=(email) required; }
            label { "Kata sandi" input type="password" name="password" minlength="8" required; }
            button.primary type="submit" { "Daftar" }
        }
        (google_button("register", "Daftar dengan Google"))
        p.muted { "Sudah punya akun? " a href="/login" { "Masuk" } }
    };
    page(ctx, "Daftar", content)
}

pub fn verify_page(ctx: &PageContext, email: &str, messages: &FormNotice) -> Markup {
    let content = html! {
        h1 { "Verifikasi Email" }
        (messages.render())
        p { "Masukkan 6 digit kode yang kami kirim ke " strong { (email) } "." }
        form.stack method="post" action="/verify" {
            input type="hidden" name="email" value=(email);
            label { "Kode verifikasi"
                input type="text" name="code" inputmode="numeric" pattern="[0-9]{6}" maxlength="6" required;
            }
            button.primary type="submit" { "Verifikasi" }
        }
        form method="post" action="/verify/resend" {
            input type="hidden" name="email" value=(email);
            button type="submit" { "Kirim ulang kode" }
        }
    };
    page(ctx, "Verifikasi Email", content)
}

fn status_label(status: TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Pending => "Menunggu konfirmasi",
        TransactionStatus::Confirmed => "Diterima",
        TransactionStatus::Rejected => "Ditolak",
    }
}

pub fn profile_page(
    ctx: &PageContext,
    user: &UserResponse,
    donations: &[TransactionResponse],
) -> Markup {
    let confirmed_total: f64 = donations
        .iter()
        .filter(|d| d.status == TransactionStatus::Confirmed)
        .map(|d| d.amount)
        .sum();
    let content = html! {
        h1 { "Profil" }
        section.card {
            div.card-body {
                @if let Some(avatar) = &user.avatar_url {
                    img src=(avatar) alt=(user.name) width="64" height="64";
                }
                h2 { (user.name) }
                p.muted { (user.email) }
                @if user.is_contributor {
                    p { (Icon::Heart.render()) " Donatur · total " (format_rupiah(confirmed_total)) }
                }
            }
        }
        h2 { "Riwayat donasi" }
        @if donations.is_empty() {
            p.muted { "Belum ada donasi. " a href="/campaigns" { "Lihat program" } }
        } @else {
            table {
                thead { tr { th { "Tanggal" } th { "Jumlah" } th { "Metode" } th { "Status" } } }
                tbody {
                    @for d in donations {
                        tr {
                            td { (d.created_at.format("%d/%m/%Y").to_string()) }
                            td { (format_rupiah(d.amount)) }
                            td { (d.payment_method.to_string()) }
                            td { (status_label(d.status)) }
                        }
                    }
                }
            }
        }
        p { a href="/logout" { "Keluar" } }
    };
    page(ctx, "Profil", content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{PaymentMethod, UserRole};
    use crate::views::layout::test_support::context;
    use chrono::Utc;

    #[test]
    fn test_verify_page_keeps_email() {
        let html = verify_page(
            &context(vec![]),
            "ahmad@example.com",
            &FormNotice::info("Kode telah dikirim"),
        )
        .into_string();
        assert!(html.contains(r#"name="email" value="ahmad@example.com""#));
        assert!(html.contains("Kode telah dikirim"));
    }

    #[test]
    fn test_profile_lists_donations() {
        let user = UserResponse {
            id: 1,
            name: "Ahmad".to_string(),
            email: "ahmad@example.com".to_string(),
            role: UserRole::User,
            is_verified: true,
            is_contributor: true,
            avatar_url: None,
            has_password: true,
            created_at: Utc::now(),
        };
        let donation = TransactionResponse {
            id: 9,
            amount: 50_000.0,
            campaign_id: Some(1),
            menu_item_id: None,
            user_id: Some(1),
            donor_name: None,
            message: None,
            payment_method: PaymentMethod::Qris,
            status: TransactionStatus::Confirmed,
            created_at: Utc::now(),
        };
        let html = profile_page(&context(vec![]), &user, &[donation]).into_string();
        assert!(html.contains("Rp 50.000"));
        assert!(html.contains("Diterima"));
        assert!(html.contains("QRIS"));
    }
}
