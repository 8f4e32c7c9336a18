//! Form handlers

use axum::{extract::State, response::Html, Json};
use housing_core::logic::features::{FeatureDomain, LayoutInfo};
use housing_core::logic::pipeline::FormField;

use crate::models::FormResponse;
use crate::AppState;

pub const FORM_TITLE: &str = "Boston Housing Price Prediction";

/// Field list with defaults and reference statistics
pub async fn schema(State(state): State<AppState>) -> Json<FormResponse> {
    Json(FormResponse {
        title: FORM_TITLE,
        fields: state.context.form_schema(),
        layout: LayoutInfo::current(),
    })
}

/// Plain HTML form posting to `/api/v1/predict`
pub async fn page(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state.context.form_schema()))
}

fn render_field(field: &FormField) -> String {
    let control = match (field.domain, field.choices) {
        (FeatureDomain::Flag, Some(choices)) => choices
            .iter()
            .map(|choice| {
                let checked = if field.default_choice == Some(*choice) { " checked" } else { "" };
                format!(
                    r#"<label><input type="radio" name="{name}" value="{choice}"{checked}> {choice}</label>"#,
                    name = field.name,
                )
            })
            .collect::<Vec<_>>()
            .join(" "),
        _ => format!(
            r#"<input type="number" name="{name}" min="0" step="{step}" value="{default}">"#,
            name = field.name,
            step = field.step,
            default = field.default,
        ),
    };

    format!(
        "<div class=\"field\"><label>{} ({})</label>{}</div>",
        field.description, field.name, control
    )
}

fn render_page(fields: &[FormField]) -> String {
    let inputs: String = fields.iter().map(render_field).collect::<Vec<_>>().join("\n");

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<h1>{title}</h1>
<form id="housing">
{inputs}
<button type="submit">Predict</button>
</form>
<ul id="advisories"></ul>
<p id="result"></p>
<script>
document.getElementById("housing").addEventListener("submit", async (ev) => {{
  ev.preventDefault();
  const inputs = {{}};
  for (const [name, value] of new FormData(ev.target)) {{
    if (value === "") continue;
    inputs[name] = isNaN(Number(value)) ? value : Number(value);
  }}
  const res = await fetch("/api/v1/predict", {{
    method: "POST",
    headers: {{ "Content-Type": "application/json" }},
    body: JSON.stringify({{ inputs }}),
  }});
  const body = await res.json();
  const list = document.getElementById("advisories");
  list.innerHTML = "";
  if (!res.ok) {{
    for (const f of body.fields || []) list.insertAdjacentHTML("beforeend", `<li>${{f.feature}}: ${{f.reason}}</li>`);
    document.getElementById("result").textContent = body.error;
    return;
  }}
  for (const a of body.advisories) list.insertAdjacentHTML("beforeend", `<li>${{a.message}}</li>`);
  document.getElementById("result").textContent =
    `Predicted median home value: ${{body.prediction.formatted_price}}`;
}});
</script>
</body>
</html>
"#,
        title = FORM_TITLE,
    )
}
