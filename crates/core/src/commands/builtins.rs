//! Built-in commands.

use std::path::PathBuf;

use chrono::Local;

use super::CommandError;
use super::registry::{Call, Command};
use crate::plotting::{CurveData, PlotRequest};
use crate::render::LabContext;
use crate::scripting::Scope;
use crate::variables::{Plot, Table};

const TABLE_BODY_KEYWORDS: &[(&str, &str)] =
    &[("split_each", "false"), ("precision", "3"), ("cast_to_int", "false")];

const TABLE_KEYWORDS: &[(&str, &str)] = &[
    ("modifiers", "h!"),
    ("split_each", "false"),
    ("precision", "3"),
    ("cast_to_int", "false"),
];

const FIGURE_KEYWORDS: &[(&str, &str)] = &[("modifiers", "h!"), ("width", "\\linewidth")];

pub const BUILTINS: &[Command] = &[
    Command::new("date", &[], date).with_summary("current local time"),
    Command::new("labgen_dump", &[], labgen_dump)
        .with_summary("diagnostic dump of templates, commands and variables"),
    Command::new("table_label", &["table_var"], table_label).with_summary("label of a table"),
    Command::new("table_caption", &["table_var"], table_caption)
        .with_summary("human-readable title of a table"),
    Command::new("table_body", &["table_var"], table_body)
        .with_keywords(TABLE_BODY_KEYWORDS)
        .with_summary("header and rows in tabular syntax"),
    Command::new("table", &["table_var"], table)
        .with_keywords(TABLE_KEYWORDS)
        .with_summary("complete table environment"),
    Command::new("plot", &["plot_var"], plot).with_summary("render a plot, returns the image path"),
    Command::new("figure", &["plot_var"], figure)
        .with_keywords(FIGURE_KEYWORDS)
        .with_summary("render a plot inside a figure environment"),
    Command::new("figure_label", &["plot_var"], figure_label)
        .with_summary("label of the figure derived from a plot"),
];

/// `asctime` layout, e.g. `Sun Sep 16 01:03:52 1973`.
fn date(_: &LabContext, _: &Call<'_>) -> Result<String, CommandError> {
    Ok(Local::now().format("%a %b %e %H:%M:%S %Y").to_string())
}

fn labgen_dump(ctx: &LabContext, call: &Call<'_>) -> Result<String, CommandError> {
    let mut out = vec!["% labgen_dump".to_string()];

    for t in ctx.templates().iter() {
        let params: Vec<String> = t
            .params()
            .iter()
            .map(|p| match &p.default {
                Some(d) => format!("{}={d}", p.name),
                None => p.name.clone(),
            })
            .collect();
        out.push(format!("% template #{}({})", t.name, params.join(", ")));
    }
    for c in ctx.commands().iter() {
        out.push(format!("% command {c}"));
    }
    for v in ctx.store().iter() {
        out.push(format!("% {} {} \"{}\" ({})", v.kind_name(), v.name(), v.title(), v.label()));
    }
    out.push(format!("% keywords: {:?}", call.keywords));
    out.push(format!("% date: {}", date(ctx, call)?));
    Ok(out.join("\n"))
}

fn table_label(ctx: &LabContext, call: &Call<'_>) -> Result<String, CommandError> {
    Ok(ctx.store().table(call.arg(0))?.label.clone())
}

fn table_caption(ctx: &LabContext, call: &Call<'_>) -> Result<String, CommandError> {
    Ok(ctx.store().table(call.arg(0))?.title.clone())
}

fn table_body(ctx: &LabContext, call: &Call<'_>) -> Result<String, CommandError> {
    let table = ctx.store().table(call.arg(0))?;
    format_table_body(table, call)
}

/// Most digits an `f64` can meaningfully show after the point.
const MAX_PRECISION: usize = 17;

fn format_table_body(table: &Table, call: &Call<'_>) -> Result<String, CommandError> {
    let precision: usize = call.parse_keyword("precision", 3)?;
    if precision > MAX_PRECISION {
        return Err(CommandError::InvalidArgument {
            command: call.command.to_string(),
            param: "precision".to_string(),
            reason: format!("{precision} exceeds the maximum of {MAX_PRECISION} digits"),
        });
    }
    let cast_to_int = call.flag("cast_to_int");
    let separator = if call.flag("split_each") { "\n\\hline\n" } else { "\n" };

    let header = format!("{}\\\\\n\\hline\n", table.columns().join(" & "));
    let rows: Vec<String> = table
        .rows
        .iter()
        .map(|row| {
            let cells: Vec<String> = row
                .iter()
                .map(|&v| {
                    if cast_to_int { (v.trunc() as i64).to_string() } else { format!("{v:.precision$}") }
                })
                .collect();
            format!("{} \\\\", cells.join(" & "))
        })
        .collect();

    Ok(header + &rows.join(separator))
}

fn table(ctx: &LabContext, call: &Call<'_>) -> Result<String, CommandError> {
    let table = ctx.store().table(call.arg(0))?;
    let body = format_table_body(table, call)?;
    let columns = vec!["c"; table.columns().len()].join("|");
    let modifiers = call.keyword("modifiers").unwrap_or("h!");

    Ok(format!(
        "\\begin{{table}}[{modifiers}]\n\
         \x20   \\caption{{{caption}}}\n\
         \x20   \\label{{{label}}}\n\
         \x20   \\begin{{center}}\n\
         \x20       \\begin{{tabular}}{{{columns}}}\n\
         \x20       \\hline\n\
         {body}\n\
         \x20       \\hline\n\
         \x20       \\end{{tabular}}\n\
         \x20   \\end{{center}}\n\
         \\end{{table}}",
        caption = table.title,
        label = table.label,
    ))
}

fn plot(ctx: &LabContext, call: &Call<'_>) -> Result<String, CommandError> {
    let plot = ctx.store().plot(call.arg(0))?;
    let path = render_plot(ctx, call, plot)?;
    Ok(path.display().to_string())
}

fn figure(ctx: &LabContext, call: &Call<'_>) -> Result<String, CommandError> {
    let plot = ctx.store().plot(call.arg(0))?;
    let figure = ctx.store().figure(&plot.figure_name())?;
    let path = render_plot(ctx, call, plot)?;
    let modifiers = call.keyword("modifiers").unwrap_or("h!");
    let width = call.keyword("width").unwrap_or("\\linewidth");

    Ok(format!(
        "\\begin{{figure}}[{modifiers}]\n\
         \x20   \\centering\n\
         \x20   \\includegraphics[width={width}]{{{path}}}\n\
         \x20   \\caption{{{caption}}}\n\
         \x20   \\label{{{label}}}\n\
         \\end{{figure}}",
        path = path.display(),
        caption = figure.title,
        label = figure.label,
    ))
}

fn figure_label(ctx: &LabContext, call: &Call<'_>) -> Result<String, CommandError> {
    let plot = ctx.store().plot(call.arg(0))?;
    Ok(ctx.store().figure(&plot.figure_name())?.label.clone())
}

/// Evaluate every curve of `plot` and hand the result to the renderer.
fn render_plot(ctx: &LabContext, call: &Call<'_>, plot: &Plot) -> Result<PathBuf, CommandError> {
    let mut scope = Scope::new();
    for table in ctx.store().tables() {
        scope.bind(table);
    }

    let mut curves = Vec::new();
    for curve in plot.curves() {
        scope.set_prelude(curve.scope);
        let eval = |expr: &str| {
            ctx.evaluator().evaluate(&scope, expr).map_err(|source| CommandError::Evaluation {
                plot: plot.name.clone(),
                curve: curve.title.to_string(),
                source,
            })
        };
        let x = eval(curve.x)?;
        let y = eval(curve.y)?;
        if x.len() != y.len() {
            return Err(CommandError::InvalidArgument {
                command: call.command.to_string(),
                param: format!("{}.{}", plot.name, curve.title),
                reason: format!("x has {} values but y has {}", x.len(), y.len()),
            });
        }
        curves.push(CurveData {
            title: curve.title.to_string(),
            x,
            y,
            style: curve.style.to_string(),
            color: curve.color.to_string(),
        });
    }

    let (x_label, y_label) = plot.axes();
    let request = PlotRequest {
        file_stem: plot.figure_name(),
        title: plot.title.clone(),
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        xrange: plot.xrange(),
        yrange: plot.yrange(),
        curves,
    };
    Ok(ctx.renderer().render(&request)?)
}
