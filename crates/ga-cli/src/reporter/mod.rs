//! Terminal rendering. Everything renders to a `String`; the caller decides
//! where it goes.

mod compare;
mod review;

pub use compare::render_multi;
pub use review::{render_model_header, render_review};

use ga_runner::Aggregate;

/// One model: header plus review. Several: comparison view.
pub fn render(models: &[String], agg: &Aggregate) -> String {
    match models {
        [model] => {
            let result = agg.results.get(model);
            let mut out = render_model_header(
                model,
                agg.durations.get(model).copied(),
                result.map(|r| r.approval_status),
            );
            if let Some(result) = result {
                out.push_str(&render_review(result));
            }
            out
        }
        _ => render_multi(models, agg),
    }
}
