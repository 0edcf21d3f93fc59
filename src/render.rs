//! HTML adapter: turns view models into static markup.
//!
//! This is the thin side-effect layer over the pure views. Styling and
//! chart drawing belong to external collaborators: pages reference a
//! stylesheet by class names and embed chart specs as JSON blocks for a
//! chart renderer to pick up.

use crate::catalog::RunOption;
use crate::fmt::Tag;
use crate::model::Content;
use crate::views::leaderboard::{ChartSpec, LeaderboardRow};
use crate::views::needle::DatasetRef;
use crate::views::trajectory::{InfoPart, TxRow};

/// Minimal HTML escaping for text nodes and attribute values.
pub fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_tag(tag: &Tag) -> String {
    format!("<span class=\"tag {}\">{}</span>", tag.class, esc(&tag.label))
}

fn render_tag_or_dash(tag: Option<&Tag>) -> String {
    tag.map(render_tag).unwrap_or_else(|| "-".to_string())
}

/// Shared page shell. `root` is the relative prefix back to the site
/// root ("" for top-level pages, "../" for explorer pages).
fn page_shell(content: &Content, title: &str, root: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\"/>\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/>\n\
         <title>{title} · {site}</title>\n\
         <link rel=\"stylesheet\" href=\"{root}assets/site.css\"/>\n\
         </head>\n<body>\n\
         <header class=\"site-header\">\n\
         <span class=\"site-title\">{site}</span>\n\
         <nav>\n\
         <a href=\"{root}index.html\">{nav_home}</a>\n\
         <a href=\"{root}trajectories/index.html\">{nav_traj}</a>\n\
         <a href=\"{root}needle.html\">{nav_needle}</a>\n\
         </nav>\n</header>\n\
         <main>\n{body}</main>\n\
         </body>\n</html>\n",
        title = esc(title),
        site = esc(&content.site.title),
        root = root,
        nav_home = esc(&content.site.nav.home),
        nav_traj = esc(&content.site.nav.trajectories),
        nav_needle = esc(&content.site.nav.needle),
        body = body,
    )
}

/// The shared leaderboard/needle table body: one row per run, links into
/// the trajectory explorer by option fragment.
fn run_rows_html(rows: &[LeaderboardRow], root: &str) -> String {
    let mut out = String::new();
    for row in rows {
        let coverage_link = format!(
            "<a href=\"{root}trajectories/{frag}.html#{frag}\">Coverage</a>",
            root = root,
            frag = esc(&row.coverage_fragment)
        );
        let needle_link = row
            .needle_fragment
            .as_deref()
            .map(|frag| {
                format!(
                    " · <a href=\"{root}trajectories/{frag}.html#{frag}\">Needle</a>",
                    root = root,
                    frag = esc(frag)
                )
            })
            .unwrap_or_default();
        let unique_actions = row
            .unique_actions
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "<tr>\
             <td>{rank}</td>\
             <td>{agent}</td>\
             <td class=\"num\">{coverage}</td>\
             <td class=\"num\">{intent}</td>\
             <td>{badge}</td>\
             <td class=\"num\">{needle_score}</td>\
             <td class=\"num\">{actions}</td>\
             <td>{coverage_link}{needle_link}</td>\
             </tr>\n",
            rank = row.rank,
            agent = esc(&row.agent),
            coverage = row.coverage_median,
            intent = row.intent_score,
            badge = render_tag_or_dash(row.needle_badge.as_ref()),
            needle_score = row.needle_score.as_deref().unwrap_or("-"),
            actions = unique_actions,
            coverage_link = coverage_link,
            needle_link = needle_link,
        ));
    }
    out
}

fn table_head(content: &Content) -> String {
    let cols = &content.needle.table.cols;
    format!(
        "<thead><tr><th>{}</th><th>{}</th><th>{}</th><th>{}</th><th>{}</th><th>{}</th><th>{}</th><th>{}</th></tr></thead>",
        esc(&cols.rank),
        esc(&cols.agent),
        esc(&cols.coverage),
        esc(&cols.intent),
        esc(&cols.needle_result),
        esc(&cols.needle_score),
        esc(&cols.actions),
        esc(&cols.runs),
    )
}

/// A chart spec embedded for the external chart renderer.
fn chart_block(id: &str, title: &str, spec: &ChartSpec) -> String {
    let json = serde_json::to_string(spec).unwrap_or_else(|_| "{}".to_string());
    format!(
        "<section class=\"chart\">\n<h3>{}</h3>\n<canvas id=\"{}\"></canvas>\n\
         <script type=\"application/json\" data-chart=\"{}\">{}</script>\n</section>\n",
        esc(title),
        id,
        id,
        json
    )
}

pub fn leaderboard_page(
    content: &Content,
    rows: &[LeaderboardRow],
    source_line: &str,
    score_chart: &ChartSpec,
    needle_chart: &ChartSpec,
) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        "<section class=\"hero\">\n<h1>{}</h1>\n<p>{}</p>\n",
        esc(&content.home.hero.title),
        esc(&content.home.hero.subtitle)
    ));
    for pillar in &content.home.hero.pillars {
        body.push_str(&format!(
            "<div class=\"pillar\"><h3>{}</h3><p>{}</p></div>\n",
            esc(&pillar.title),
            esc(&pillar.text)
        ));
    }
    body.push_str("</section>\n");

    body.push_str(&format!(
        "<section class=\"scoreboard\">\n<h2>{}</h2>\n<p class=\"source\">{}</p>\n\
         <table>\n{}<tbody>\n{}</tbody>\n</table>\n\
         <a href=\"trajectories/index.html\">{}</a>\n</section>\n",
        esc(&content.home.scoreboard.title),
        esc(source_line),
        table_head(content),
        run_rows_html(rows, ""),
        esc(&content.home.scoreboard.link_text),
    ));

    body.push_str(&chart_block("score-chart", &content.home.charts.coverage, score_chart));
    body.push_str(&chart_block("needle-chart", &content.home.charts.needle, needle_chart));

    if !content.home.howto.steps.is_empty() {
        body.push_str(&format!("<section class=\"howto\">\n<h2>{}</h2>\n<ol>\n", esc(&content.home.howto.title)));
        for step in &content.home.howto.steps {
            body.push_str(&format!("<li>{}</li>\n", esc(step)));
        }
        body.push_str(&format!("</ol>\n<p>{}</p>\n</section>\n", esc(&content.home.howto.footnote)));
    }
    body.push_str(&format!("<footer>{}</footer>\n", esc(&content.home.footer)));

    page_shell(content, &content.site.nav.home, "", &body)
}

fn dataset_card(card_label: &str, description: &str, cta: &str, dataset: &DatasetRef) -> String {
    let (href, target) = match &dataset.href {
        Some(url) => (esc(url), "_blank"),
        None => ("#".to_string(), "_self"),
    };
    format!(
        "<div class=\"dataset\">\n<h3>{}</h3>\n<code>{}</code>\n<p>{}</p>\n\
         <a href=\"{}\" target=\"{}\">{}</a>\n</div>\n",
        esc(card_label),
        esc(&dataset.path),
        esc(description),
        href,
        target,
        esc(cta),
    )
}

pub fn needle_page(
    content: &Content,
    rows: &[LeaderboardRow],
    coverage: &DatasetRef,
    needle: &DatasetRef,
) -> String {
    let page = &content.needle;
    let mut body = String::new();
    body.push_str(&format!(
        "<h1>{}</h1>\n<p>{}</p>\n",
        esc(&page.title),
        esc(&page.subtitle)
    ));
    body.push_str(&dataset_card(
        &page.datasets.coverage.label,
        &page.datasets.coverage.description,
        &page.datasets.coverage.cta,
        coverage,
    ));
    body.push_str(&dataset_card(
        &page.datasets.needle.label,
        &page.datasets.needle.description,
        &page.datasets.needle.cta,
        needle,
    ));
    body.push_str(&format!(
        "<table>\n<caption>{}</caption>\n{}<tbody>\n{}</tbody>\n</table>\n",
        esc(&page.table.caption),
        table_head(content),
        run_rows_html(rows, ""),
    ));
    if !page.notes.items.is_empty() {
        body.push_str(&format!("<section class=\"notes\">\n<h2>{}</h2>\n<ul>\n", esc(&page.notes.title)));
        for item in &page.notes.items {
            body.push_str(&format!("<li>{}</li>\n", esc(item)));
        }
        body.push_str("</ul>\n</section>\n");
    }
    page_shell(content, &content.site.nav.needle, "", &body)
}

fn info_banner(parts: &[InfoPart]) -> String {
    let rendered: Vec<String> = parts
        .iter()
        .map(|p| match &p.badge {
            Some(tag) => format!("{} {}", esc(&p.text), render_tag(tag)),
            None => esc(&p.text),
        })
        .collect();
    format!("<p class=\"run-info\">{}</p>\n", rendered.join(" · "))
}

/// One explorer page: transaction table with an expandable detail block
/// per row (the static rendition of the detail modal).
pub fn trajectory_page(
    content: &Content,
    heading: &str,
    anchor: Option<&str>,
    info: &[InfoPart],
    rows: &[TxRow],
) -> String {
    let traj = &content.trajectories;
    let mut body = String::new();
    let anchor_attr = anchor
        .map(|id| format!(" id=\"{}\"", esc(id)))
        .unwrap_or_default();
    body.push_str(&format!(
        "<section{}>\n<h1>{}</h1>\n<p>{}</p>\n",
        anchor_attr,
        esc(heading),
        esc(&traj.subtitle)
    ));
    body.push_str(&info_banner(info));
    body.push_str(
        "<table>\n<thead><tr><th>Digest</th><th>Domains</th><th>Actions</th>\
         <th>Bonus</th><th>Penalty</th><th></th></tr></thead>\n<tbody>\n",
    );
    for row in rows {
        let domains = if row.domains.is_empty() {
            "-".to_string()
        } else {
            row.domains.iter().map(render_tag).collect::<Vec<_>>().join(" ")
        };
        let actions = if row.actions.is_empty() {
            "-".to_string()
        } else {
            row.actions.iter().map(|a| esc(a)).collect::<Vec<_>>().join("<br/>")
        };
        let detail = serde_json::to_string_pretty(&row.detail).unwrap_or_else(|_| "{}".to_string());
        body.push_str(&format!(
            "<tr>\
             <td class=\"mono\">{digest}</td>\
             <td>{domains}</td>\
             <td class=\"actions\">{actions}</td>\
             <td class=\"num\">{bonus}</td>\
             <td class=\"num\">{penalty}</td>\
             <td><details><summary>{detail_title}</summary><pre>{detail}</pre></details></td>\
             </tr>\n",
            digest = esc(&row.digest),
            domains = domains,
            actions = actions,
            bonus = row.bonus,
            penalty = row.penalty,
            detail_title = esc(&traj.detail_title),
            detail = esc(&detail),
        ));
    }
    body.push_str("</tbody>\n</table>\n</section>\n");
    page_shell(content, heading, "../", &body)
}

/// Explorer index: every catalog option, addressable by its fragment id.
pub fn explorer_index_page(content: &Content, catalog: &[RunOption]) -> String {
    let traj = &content.trajectories;
    let mut body = String::new();
    body.push_str(&format!(
        "<h1>{}</h1>\n<p>{}</p>\n<p class=\"note\">{}</p>\n<ul class=\"run-list\">\n",
        esc(&traj.title),
        esc(&traj.subtitle),
        esc(&traj.uploader.note)
    ));
    if catalog.is_empty() {
        body.push_str("<li>No leaderboard runs found</li>\n");
    }
    for option in catalog {
        body.push_str(&format!(
            "<li id=\"{id}\"><a href=\"{id}.html#{id}\">{label}</a></li>\n",
            id = esc(&option.id),
            label = esc(&option.label),
        ));
    }
    body.push_str("</ul>\n");
    page_shell(content, &traj.title, "../", &body)
}
