use crate::entities::PaymentMethod;
use crate::models::{CampaignResponse, CategoryResponse, TransactionResponse};
use crate::services::PaymentSettings;
use crate::utils::money::format_rupiah;
use crate::views::components::{campaign_card, progress_bar, share_action};
use crate::views::layout::{PageContext, notice, page};
use maud::{Markup, html};

pub fn campaign_list_page(
    ctx: &PageContext,
    campaigns: &[CampaignResponse],
    categories: &[CategoryResponse],
    selected: Option<&str>,
) -> Markup {
    let content = html! {
        h1 { "Program Donasi" }
        nav.share aria-label="Kategori" {
            a href="/campaigns" { "Semua" }
            @for category in categories {
                @let is_selected = selected == Some(category.slug.as_str());
                a href={ "/campaigns?category=" (category.slug) } aria-current=[is_selected.then_some("page")] {
                    (category.name)
                }
            }
        }
        @if campaigns.is_empty() {
            p.muted { "Belum ada program donasi di kategori ini." }
        } @else {
            div.cards {
                @for campaign in campaigns {
                    (campaign_card(campaign))
                }
            }
        }
    };
    page(ctx, "Program Donasi", content)
}

/// Donation form shared by campaign pages and donation-type menu pages.
/// Exactly one of `campaign_id` / `menu_item_id` is expected.
pub fn donation_form(
    campaign_id: Option<i64>,
    menu_item_id: Option<i64>,
    ctx: &PageContext,
) -> Markup {
    let user = ctx.user.as_ref();
    html! {
        form.stack method="post" action="/donate" {
            @if let Some(id) = campaign_id {
                input type="hidden" name="campaign_id" value=(id);
            }
            @if let Some(id) = menu_item_id {
                input type="hidden" name="menu_item_id" value=(id);
            }
            label { "Nominal (Rp)"
                input type="text" inputmode="numeric" name="amount" placeholder="100.000" required;
            }
            label { "Nama"
                input type="text" name="donor_name" value=[user.map(|u| u.name.as_str())] placeholder="Hamba Allah";
            }
            label { "Email"
                input type="email" name="donor_email" value=[user.map(|u| u.email.as_str())];
            }
            label { "Metode pembayaran"
                select name="payment_method" {
                    option value="qris" { (PaymentMethod::Qris.to_string()) }
                    option value="bank_transfer" { (PaymentMethod::BankTransfer.to_string()) }
                    option value="cash" { (PaymentMethod::Cash.to_string()) }
                }
            }
            label { "Pesan / doa"
                textarea name="message" rows="3" {}
            }
            button.primary type="submit" { "Donasi sekarang" }
        }
    }
}

pub fn payment_instructions(payment: &PaymentSettings) -> Markup {
    html! {
        @if payment.qris_image.is_some() || payment.bank_account.is_some() {
            section {
                h3 { "Cara pembayaran" }
                @if let Some(src) = &payment.qris_image {
                    p { "Pindai QRIS berikut:" }
                    img src=(src) alt="QRIS" width="240";
                }
                @if let Some(account) = &payment.bank_account {
                    p { "Transfer ke rekening: " strong { (account) } }
                }
            }
        }
    }
}

pub fn campaign_detail_page(
    ctx: &PageContext,
    campaign: &CampaignResponse,
    payment: &PaymentSettings,
    error: Option<&str>,
) -> Markup {
    let content = html! {
        article {
            @if let Some(src) = &campaign.image_url {
                img src=(src) alt=(campaign.title) style="width:100%;border-radius:12px";
            }
            h1 { (campaign.title) }
            @if let Some(category) = &campaign.category {
                p.muted { (category.name) }
            }
            (progress_bar(campaign.progress_percent))
            p {
                strong { (format_rupiah(campaign.current_amount)) }
                " terkumpul dari target " (format_rupiah(campaign.target_amount))
            }
            @if let Some(end) = campaign.end_date {
                p.muted { "Berakhir " (end.format("%d %b %Y").to_string()) }
            }
            @for paragraph in campaign.description.split("\n\n").filter(|p| !p.trim().is_empty()) {
                p { (paragraph.trim()) }
            }
            (share_action(&ctx.absolute_url(), &campaign.title))
        }
        section {
            h2 { "Donasi" }
            (notice(error, true))
            @if campaign.is_open {
                (donation_form(Some(campaign.id), None, ctx))
                (payment_instructions(payment))
            } @else {
                p.muted { "Program ini sudah tidak menerima donasi." }
            }
        }
    };
    page(ctx, &campaign.title, content)
}

pub fn donation_thanks_page(
    ctx: &PageContext,
    transaction: &TransactionResponse,
    payment: &PaymentSettings,
) -> Markup {
    let content = html! {
        h1 { "Jazakallahu khairan" }
        div.notice {
            "Donasi Anda sebesar " strong { (format_rupiah(transaction.amount)) }
            " telah kami catat dengan nomor #" (transaction.id)
            " dan menunggu konfirmasi pengurus."
        }
        p { "Metode pembayaran: " (transaction.payment_method.to_string()) }
        (payment_instructions(payment))
        p { a href="/campaigns" { "Kembali ke program donasi" } }
    };
    page(ctx, "Terima kasih", content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::SessionUser;
    use crate::entities::UserRole;
    use crate::views::layout::test_support::context;

    #[test]
    fn test_donation_form_prefills_session_user() {
        let mut ctx = context(vec![]);
        ctx.user = Some(SessionUser {
            id: 1,
            email: "ahmad@example.com".to_string(),
            name: "Ahmad".to_string(),
            role: UserRole::User,
        });
        let html = donation_form(Some(4), None, &ctx).into_string();
        assert!(html.contains(r#"name="campaign_id" value="4""#));
        assert!(html.contains(r#"value="Ahmad""#));
        assert!(!html.contains("menu_item_id"));
    }

    #[test]
    fn test_payment_instructions_hidden_without_settings() {
        let payment = PaymentSettings {
            qris_image: None,
            bank_account: None,
        };
        assert_eq!(payment_instructions(&payment).into_string(), "");
    }
}
