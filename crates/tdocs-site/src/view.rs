//! HTML templates.
//!
//! [`render`] is a pure function of the [`View`]: the same view always
//! produces the same markup. Internal links use hash-history form
//! (`#/index`) so the site works from a static file server.

use std::fmt::Write;

use tdocs_renderer::escape_html;

use crate::context::{CommitSummary, IndexLink};

pub const DISCORD_URL: &str = "https://discord.gg/ytJj3eQ74B";
pub const REPO_URL: &str = "https://github.com/dzshn/tetris-discord";
pub const INVITE_URL: &str = "https://discord.com/api/oauth2/authorize?client_id=883520648553594920&permissions=116736&scope=bot%20applications.commands";
pub const PATREON_URL: &str = "https://www.patreon.com/dzshn";
pub const LICENSE_URL: &str = "https://github.com/dzshn/tetris-discord/blob/main/LICENSE";

const COPYRIGHT: &str = "Copyright (c) 2021 Sofia \"dzshn\" N. L.";

/// Markup shown while a document is loading.
pub const LOADING_HTML: &str = r#"<h1 class="mono">Loading...</h1>"#;

// Shown on the changelog until commit data is available.
const CHANGELOG_PLACEHOLDER: &str = r"<i>// this page is still in the works.</i> <br> <br>

(t:=__import__('iter'+'tool'+'s')),+(m:= <br>
__import__('numpy').zeros((32,56),dtype= <br>
int)),[((c:=(x+y*1j)/16-(2.5+1j)),(z:=0j <br>
),(i:=0),[*t.takewhile(lambda x:abs(z)&lt;= <br>
2,(((z:=z**2+c),(i:=i+1))for _ in range( <br>
512)))],m.__setitem__((y,x),i))for (x,y) <br>
in t.product(*map(range,reversed(m.shape <br>
)))],print('\n'.join(''.join('█▓▒░ ░▒▓█' <br>
[i%9]for i in j)for j in m)) <br> <br>";

/// What a page displays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum View<'a> {
    Home { greeting: String, first_visit: bool },
    Index { entries: &'a [IndexLink] },
    Loading,
    Document { html: &'a str },
    Failed { page: &'a str, message: &'a str },
    Changelog { commits: &'a [CommitSummary] },
    NotFound,
}

/// Render a view to HTML, footer included.
#[must_use]
pub fn render(view: &View<'_>) -> String {
    let mut out = String::new();
    match view {
        View::Home {
            greeting,
            first_visit,
        } => home(&mut out, greeting, *first_visit),
        View::Index { entries } => index(&mut out, entries),
        View::Loading => {
            let _ = writeln!(out, "<main>{LOADING_HTML}</main>");
        }
        View::Document { html } => {
            let _ = writeln!(out, "<main>{html}</main>");
        }
        View::Failed { page, message } => {
            let _ = writeln!(
                out,
                "<main>\n<h1>Something went wrong</h1>\n\
                 <p>Couldn't load <b>{}</b>: {}</p>\n\
                 {}\n</main>",
                escape_html(page),
                escape_html(message),
                router_link("/", "Go back to main page"),
            );
        }
        View::Changelog { commits } => changelog(&mut out, commits),
        View::NotFound => {
            let _ = writeln!(
                out,
                "<h1>404!</h1>\n\
                 <p>Looks like that page doesn't exist... <br>\n\
                 Think it's an error? let us know in the discord server!</p> <br>\n\
                 {}",
                router_link("/", "Go back to main page"),
            );
        }
    }
    footer(&mut out);
    out
}

/// Hash-history href for a router path.
#[must_use]
pub fn href(path: &str) -> String {
    format!("#{path}")
}

fn router_link(path: &str, text: &str) -> String {
    format!(r#"<a href="{}" class="btn">{}</a>"#, href(path), escape_html(text))
}

fn external_link(url: &str, text: &str) -> String {
    format!(
        r#"<a rel="noreferrer noopener" target="_blank" href="{}">{text}</a>"#,
        escape_html(url)
    )
}

fn home(out: &mut String, greeting: &str, first_visit: bool) {
    let welcome = if first_visit { "Welcome!" } else { "Welcome back!" };
    let _ = writeln!(
        out,
        "<h1>{}</h1>\n\
         <p>\n<b id=\"welcome\">{welcome}</b>\n\
         this page aggregates info about <b>tetris-discord</b>, an\n\
         almost-guideline-compliant tetris clone that runs on a discord bot!\n</p>",
        escape_html(greeting),
    );
    if first_visit {
        out.push_str(
            "<p>\nIf it's your first time hearing about this, check out these links!\n</p>\n",
        );
    }

    out.push_str("<div id=\"links\">\n");
    for (url, text) in [
        (DISCORD_URL, "Discord server"),
        (REPO_URL, "Github repo"),
        (INVITE_URL, "Bot invite"),
        (PATREON_URL, "Patreon"),
    ] {
        out.push_str(&external_link(url, text));
        out.push('\n');
    }
    out.push_str(&router_link("/index", "View documentation"));
    out.push('\n');
    out.push_str(&router_link("/changelog", "Changelog"));
    out.push_str("\n</div>\n");
}

fn index(out: &mut String, entries: &[IndexLink]) {
    out.push_str("<nav>\n<p>\n");
    for link in entries {
        let _ = writeln!(
            out,
            r#"<li><a href="{}">{}</a></li>"#,
            escape_html(&href(&format!("/docs/{}", link.page))),
            escape_html(&link.title),
        );
    }
    out.push_str("</p>\n</nav>\n");
    out.push_str(&router_link("/", "Go back"));
    out.push('\n');
}

fn changelog(out: &mut String, commits: &[CommitSummary]) {
    out.push_str("<div>\n");
    if commits.is_empty() {
        let _ = writeln!(out, "<p class=\"mono\">\n{CHANGELOG_PLACEHOLDER}\n</p>");
    } else {
        out.push_str("<ul class=\"mono\">\n");
        for commit in commits {
            let _ = writeln!(
                out,
                r#"<li><a rel="noreferrer noopener" target="_blank" href="{REPO_URL}/commit/{}">{}</a> {}</li>"#,
                escape_html(&commit.sha),
                escape_html(commit.short_sha()),
                escape_html(&commit.message),
            );
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</div>\n");
}

fn footer(out: &mut String) {
    let _ = writeln!(
        out,
        "<footer>\n<i>{}</i>\n<i>{}</i>\n</footer>",
        escape_html(COPYRIGHT),
        external_link(LICENSE_URL, "MIT License"),
    );
}
