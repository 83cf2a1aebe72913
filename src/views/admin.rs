use crate::models::{
    CampaignResponse, MenuItemResponse, PaginatedResponse, SettingResponse, TransactionResponse,
};
use crate::services::declared_keys;
use crate::utils::money::format_rupiah;
use crate::views::layout::{PageContext, notice, page};
use maud::{Markup, PreEscaped, html};
use std::collections::HashMap;

/// Talks to the JSON admin API; the session cookie rides along.
const ADMIN_SCRIPT: &str = r#"
async function adminCall(method, url, body) {
  const res = await fetch(url, {
    method: method,
    headers: body ? {'Content-Type': 'application/json'} : {},
    body: body ? JSON.stringify(body) : undefined,
    credentials: 'same-origin'
  });
  const json = await res.json().catch(() => ({}));
  if (!res.ok || json.success === false) { alert(json.error || 'Gagal'); return false; }
  return true;
}
document.querySelectorAll('[data-tx-action]').forEach(function (btn) {
  btn.addEventListener('click', async function () {
    const ok = await adminCall('POST', '/api/admin/transactions/' + btn.dataset.id + '/' + btn.dataset.txAction);
    if (ok) { location.reload(); }
  });
});
document.querySelectorAll('[data-move]').forEach(function (btn) {
  btn.addEventListener('click', async function () {
    const rows = Array.from(document.querySelectorAll('#menu-rows tr'));
    const i = rows.findIndex(r => r.dataset.id === btn.dataset.id);
    const j = btn.dataset.move === 'up' ? i - 1 : i + 1;
    if (j < 0 || j >= rows.length) { return; }
    [rows[i], rows[j]] = [rows[j], rows[i]];
    const ids = rows.map(r => Number(r.dataset.id));
    if (await adminCall('PUT', '/api/admin/menu-items/reorder', {ids: ids})) { location.reload(); }
  });
});
document.getElementById('upload-form')?.addEventListener('submit', async function (e) {
  e.preventDefault();
  const file = document.getElementById('upload-file').files[0];
  if (!file) { return; }
  const res = await fetch('/api/admin/uploads/' + encodeURIComponent(file.name), {
    method: 'POST', body: file, credentials: 'same-origin'
  });
  const json = await res.json().catch(() => ({}));
  document.getElementById('upload-result').textContent = json.success ? json.data.url : (json.error || 'Gagal');
});
"#;

/// Everything the dashboard shows, loaded by the handler.
#[derive(Debug)]
pub struct AdminDashboard {
    pub pending: PaginatedResponse<TransactionResponse>,
    pub campaigns: Vec<CampaignResponse>,
    pub menu: Vec<MenuItemResponse>,
    pub settings: Vec<SettingResponse>,
    pub users_total: u64,
}

fn pending_table(pending: &PaginatedResponse<TransactionResponse>) -> Markup {
    html! {
        h2 { "Donasi menunggu konfirmasi (" (pending.total) ")" }
        @if pending.data.is_empty() {
            p.muted { "Tidak ada donasi yang menunggu." }
        } @else {
            table {
                thead { tr { th { "#" } th { "Donatur" } th { "Jumlah" } th { "Metode" } th { "Tujuan" } th {} } }
                tbody {
                    @for tx in &pending.data {
                        tr {
                            td { (tx.id) }
                            td { (tx.donor_name.as_deref().unwrap_or("Hamba Allah")) }
                            td { (format_rupiah(tx.amount)) }
                            td { (tx.payment_method.to_string()) }
                            td {
                                @if let Some(id) = tx.campaign_id {
                                    a href={ "/campaigns/" (id) } { "Program #" (id) }
                                } @else if let Some(id) = tx.menu_item_id {
                                    "Menu #" (id)
                                }
                            }
                            td {
                                button type="button" data-tx-action="confirm" data-id=(tx.id) { "Terima" }
                                " "
                                button type="button" data-tx-action="reject" data-id=(tx.id) { "Tolak" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn settings_form(settings: &[SettingResponse]) -> Markup {
    let stored: HashMap<&str, &str> = settings
        .iter()
        .map(|s| (s.key.as_str(), s.value.as_str()))
        .collect();
    html! {
        h2 { "Pengaturan" }
        table {
            tbody {
                @for key in declared_keys() {
                    tr {
                        th { (key.key) }
                        td {
                            form method="post" action="/admin/settings" {
                                input type="hidden" name="key" value=(key.key);
                                input type="text" name="value"
                                    value=(stored.get(key.key).copied().unwrap_or(key.default));
                                " "
                                button type="submit" { "Simpan" }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn dashboard_page(ctx: &PageContext, data: &AdminDashboard, message: Option<&str>) -> Markup {
    let open_campaigns = data.campaigns.iter().filter(|c| c.is_open).count();
    let content = html! {
        h1 { "Dasbor Admin" }
        (notice(message, false))
        div.cards {
            div.card { div.card-body { strong { (data.pending.total) } p.muted { "Donasi menunggu" } } }
            div.card { div.card-body { strong { (open_campaigns) } p.muted { "Program aktif" } } }
            div.card { div.card-body { strong { (data.menu.len()) } p.muted { "Item menu" } } }
            div.card { div.card-body { strong { (data.users_total) } p.muted { "Pengguna" } } }
        }
        (pending_table(&data.pending))

        h2 { "Program donasi" }
        table {
            thead { tr { th { "Judul" } th { "Terkumpul" } th { "Target" } th { "Status" } } }
            tbody {
                @for c in &data.campaigns {
                    tr {
                        td { a href={ "/campaigns/" (c.id) } { (c.title) } }
                        td { (format_rupiah(c.current_amount)) " (" (c.progress_percent) "%)" }
                        td { (format_rupiah(c.target_amount)) }
                        td { @if c.is_open { "Aktif" } @else { "Selesai" } }
                    }
                }
            }
        }

        h2 { "Menu" }
        table {
            thead { tr { th { "Label" } th { "Tautan" } th { "Aktif" } th {} } }
            tbody #menu-rows {
                @for item in &data.menu {
                    tr data-id=(item.id) {
                        td { span style={ "color:" (item.color) } { "●" } " " (item.label) }
                        td { code { (item.href) } }
                        td { @if item.is_active { "Ya" } @else { "Tidak" } }
                        td {
                            button type="button" data-move="up" data-id=(item.id) { "↑" }
                            button type="button" data-move="down" data-id=(item.id) { "↓" }
                        }
                    }
                }
            }
        }

        (settings_form(&data.settings))

        h2 { "Unggah gambar" }
        form #upload-form {
            input #upload-file type="file" accept="image/*";
            " "
            button type="submit" { "Unggah" }
        }
        p.muted #upload-result {}
        p.muted { "Kelola data lengkap melalui " a href="/swagger-ui/" { "API admin" } "." }
        script { (PreEscaped(ADMIN_SCRIPT)) }
    };
    page(ctx, "Dasbor Admin", content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{PaymentMethod, TransactionStatus};
    use crate::models::PaginationParams;
    use crate::views::layout::test_support::context;
    use chrono::Utc;

    #[test]
    fn test_dashboard_shows_pending_actions_and_setting_defaults() {
        let tx = TransactionResponse {
            id: 12,
            amount: 250_000.0,
            campaign_id: Some(3),
            menu_item_id: None,
            user_id: None,
            donor_name: None,
            message: None,
            payment_method: PaymentMethod::BankTransfer,
            status: TransactionStatus::Pending,
            created_at: Utc::now(),
        };
        let data = AdminDashboard {
            pending: PaginatedResponse::new(vec![tx], &PaginationParams::default(), 1),
            campaigns: vec![],
            menu: vec![],
            settings: vec![SettingResponse {
                key: "runningText_text".to_string(),
                value: "Kajian Ahad pagi".to_string(),
                updated_at: Utc::now(),
            }],
            users_total: 4,
        };
        let html = dashboard_page(&context(vec![]), &data, None).into_string();
        assert!(html.contains(r#"data-tx-action="confirm" data-id="12""#));
        assert!(html.contains("Hamba Allah"));
        assert!(html.contains(r#"value="Kajian Ahad pagi""#));
        assert!(html.contains(r#"value="1500000""#));
    }
}
