use crate::models::{ZakatKind, ZakatResult};
use crate::services::{FITRAH_RICE_KG, GOLD_NISAB_GRAMS, ZakatSettings};
use crate::utils::money::format_rupiah;
use crate::views::layout::{PageContext, notice, page};
use maud::{Markup, html};

fn number_input(name: &str, label: &str) -> Markup {
    html! {
        label { (label)
            input type="number" min="0" step="any" name=(name) placeholder="0";
        }
    }
}

pub fn zakat_page(
    ctx: &PageContext,
    prices: &ZakatSettings,
    result: Option<&ZakatResult>,
    error: Option<&str>,
) -> Markup {
    let content = html! {
        h1 { "Kalkulator Zakat" }
        p.muted {
            "Harga emas acuan " (format_rupiah(prices.gold_price_per_gram)) "/gram, nisab "
            (GOLD_NISAB_GRAMS) " gram. Zakat fitrah " (FITRAH_RICE_KG) " kg beras per jiwa @ "
            (format_rupiah(prices.rice_price_per_kg)) "/kg."
        }
        (notice(error, true))
        @if let Some(result) = result {
            section.notice {
                h2 { (result.kind.label()) }
                p { "Dasar perhitungan: " strong { (format_rupiah(result.base_amount)) } }
                @if result.nisab > 0.0 {
                    p { "Nisab: " (format_rupiah(result.nisab)) }
                }
                @if result.is_obligatory {
                    p { "Zakat yang wajib dikeluarkan: " strong { (format_rupiah(result.zakat_due)) } }
                    p { a href="/campaigns" { "Salurkan zakat Anda" } }
                } @else {
                    p { "Harta Anda belum mencapai nisab, belum wajib zakat." }
                }
            }
        }
        form.stack method="post" action="/zakat" {
            label { "Jenis zakat"
                select name="kind" {
                    @for kind in ZakatKind::ALL {
                        option value=(kind.as_str()) selected[result.is_some_and(|r| r.kind == kind)] {
                            (kind.label())
                        }
                    }
                }
            }
            fieldset {
                legend { "Zakat maal" }
                (number_input("cash", "Tabungan & uang tunai"))
                (number_input("investments", "Investasi"))
                (number_input("receivables", "Piutang"))
                (number_input("gold_value", "Nilai emas/perak"))
                (number_input("debts", "Utang jatuh tempo"))
            }
            fieldset {
                legend { "Zakat penghasilan (per bulan)" }
                (number_input("monthly_income", "Gaji"))
                (number_input("other_income", "Penghasilan lain"))
                (number_input("monthly_expenses", "Kebutuhan pokok"))
            }
            fieldset {
                legend { "Zakat emas" }
                (number_input("gold_grams", "Berat emas (gram)"))
            }
            fieldset {
                legend { "Zakat fitrah" }
                (number_input("people", "Jumlah jiwa"))
                (number_input("rice_price_per_kg", "Harga beras per kg (opsional)"))
            }
            button.primary type="submit" { "Hitung" }
        }
    };
    page(ctx, "Kalkulator Zakat", content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::layout::test_support::context;

    #[test]
    fn test_result_selects_kind_and_shows_due() {
        let prices = ZakatSettings {
            gold_price_per_gram: 1_000_000.0,
            rice_price_per_kg: 15_000.0,
        };
        let result = ZakatResult {
            kind: ZakatKind::Gold,
            base_amount: 100_000_000.0,
            nisab: 85_000_000.0,
            is_obligatory: true,
            rate_percent: 2.5,
            zakat_due: 2_500_000.0,
        };
        let html = zakat_page(&context(vec![]), &prices, Some(&result), None).into_string();
        assert!(html.contains(r#"<option value="gold" selected>"#));
        assert!(html.contains("Rp 2.500.000"));
    }
}
