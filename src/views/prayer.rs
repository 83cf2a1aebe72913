use crate::models::PrayerTimesResponse;
use crate::views::layout::{PageContext, notice, page};
use maud::{Markup, PreEscaped, html};

const LOCATE_SCRIPT: &str = r#"
document.getElementById('locate')?.addEventListener('click', function () {
  if (!navigator.geolocation) { return; }
  navigator.geolocation.getCurrentPosition(function (pos) {
    document.querySelector('input[name=lat]').value = pos.coords.latitude.toFixed(4);
    document.querySelector('input[name=lng]').value = pos.coords.longitude.toFixed(4);
    document.getElementById('prayer-form').submit();
  });
});
"#;

pub fn prayer_times_page(
    ctx: &PageContext,
    lat: &str,
    lng: &str,
    times: Option<&PrayerTimesResponse>,
    error: Option<&str>,
) -> Markup {
    let content = html! {
        h1 { "Jadwal Sholat" }
        (notice(error, true))
        @if let Some(times) = times {
            p.muted { (times.date) " · " (times.lokasi) }
            table {
                tbody {
                    @for (label, time) in times.jadwal.entries() {
                        tr { th { (label) } td { (time) } }
                    }
                }
            }
            p.muted { "Sumber: " (times.sumber) }
        }
        form.stack #prayer-form method="get" action="/prayer-times" {
            label { "Lintang" input type="text" name="lat" value=(lat) placeholder="-6.2"; }
            label { "Bujur" input type="text" name="lng" value=(lng) placeholder="106.8"; }
            button.primary type="submit" { "Tampilkan" }
            button #locate type="button" { "Gunakan lokasi saya" }
        }
        script { (PreEscaped(LOCATE_SCRIPT)) }
    };
    page(ctx, "Jadwal Sholat", content)
}
