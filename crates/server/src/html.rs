//! Server-side rendering of the dashboard page.

use server_api::svg::escape_xml as escape;
use shared::{
    domain::{page, SlideSpec, TitleAnimation},
    protocol::DashboardView,
};

const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";
const BOOTSTRAP_JS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/js/bootstrap.bundle.min.js";
const FONT_AWESOME_CSS: &str = "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.2/css/all.min.css";
/// Written by `cargo build-web`.
const CLIENT_MODULE: &str = "/static/pkg/client_core.js";

pub fn render_dashboard(view: &DashboardView) -> String {
    let mut html = String::with_capacity(16 * 1024);
    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Energía Renovable</title>
<link rel="stylesheet" href="{BOOTSTRAP_CSS}">
<link rel="stylesheet" href="{FONT_AWESOME_CSS}">
</head>
<body>
<main class="container py-4">
"#
    ));

    render_title(&mut html, &view.title_animation);
    render_carousel(&mut html, &view.slides);
    render_share_form(&mut html, view);

    html.push_str(r#"<section class="row g-4 my-4">"#);
    for chart in &view.charts {
        html.push_str(&format!(
            r#"<div class="col-md-6"><img class="img-fluid" src="{}" alt="{}"></div>"#,
            chart.data_uri,
            escape(&chart.spec.title)
        ));
    }
    html.push_str("</section>\n");

    render_table(&mut html, &view.table);

    html.push_str(&format!(
        r#"</main>
<script src="{BOOTSTRAP_JS}"></script>
<script type="module">
import init, {{ start }} from "{CLIENT_MODULE}";
await init();
start();
</script>
</body>
</html>
"#
    ));
    html
}

fn render_title(html: &mut String, animation: &TitleAnimation) {
    // The first string doubles as the no-script title.
    let fallback = animation.strings.first().map(String::as_str).unwrap_or_default();
    html.push_str(&format!(
        r#"<header class="text-center mb-4"><h1><span class="{}">{}</span></h1></header>
"#,
        escape(animation.target_selector.trim_start_matches('.')),
        escape(fallback)
    ));
}

fn render_carousel(html: &mut String, slides: &[SlideSpec]) {
    let initial_icon = slides
        .first()
        .map(|slide| slide.icon.to_string())
        .unwrap_or_default();
    html.push_str(&format!(
        r#"<section class="text-center my-4"><i id="{}" class="{} fa-4x"></i></section>
<div id="{}" class="carousel slide" data-bs-ride="carousel"><div class="carousel-inner">
"#,
        page::ENERGY_ICON_ID,
        escape(&initial_icon),
        page::ENERGY_CAROUSEL_ID
    ));

    for (index, slide) in slides.iter().enumerate() {
        let active = if index == 0 {
            format!(" {}", page::ACTIVE_SLIDE_CLASS)
        } else {
            String::new()
        };
        html.push_str(&format!(
            r#"<div class="{}{active}" {}="{}"><div class="p-5 text-center"><h3>{}</h3><p>{}</p></div></div>
"#,
            page::SLIDE_CLASS,
            page::ICON_ATTRIBUTE,
            escape(&slide.icon.to_string()),
            escape(&slide.title),
            escape(&slide.caption)
        ));
    }

    html.push_str(&format!(
        r##"</div>
<button class="carousel-control-prev" type="button" data-bs-target="#{id}" data-bs-slide="prev"><span class="carousel-control-prev-icon"></span></button>
<button class="carousel-control-next" type="button" data-bs-target="#{id}" data-bs-slide="next"><span class="carousel-control-next-icon"></span></button>
</div>
"##,
        id = page::ENERGY_CAROUSEL_ID
    ));
}

fn render_share_form(html: &mut String, view: &DashboardView) {
    html.push_str(
        r#"<section class="my-4"><form method="post" action="/" class="row g-2">
<div class="col-auto"><input class="form-control" type="text" name="consumo_total" placeholder="Consumo total (TWh)"></div>
<div class="col-auto"><button class="btn btn-success" type="submit">Calcular</button></div>
</form>
"#,
    );
    if let Some(percentage) = view.renewable_percentage {
        html.push_str(&format!(
            r#"<p class="alert alert-success mt-3" id="renewable-percentage">Porcentaje de energía renovable: {percentage:.2}%</p>
"#
        ));
    }
    if let Some(error) = &view.error {
        html.push_str(&format!(
            r#"<p class="alert alert-danger mt-3" id="share-error">{}</p>
"#,
            escape(&error.message)
        ));
    }
    html.push_str("</section>\n");
}

fn render_table(html: &mut String, rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }
    html.push_str(r#"<table class="table table-striped"><tbody>"#);
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>\n");
}
