//! Widget page rendering.

use std::fmt::Write as _;

use crate::message::Labels;
use crate::session::WidgetSession;
use crate::view::escape_html;
use crate::widget::ExampleQuestion;

/// Render the full widget page for `session`.
#[must_use]
pub fn render_page(title: &str, labels: &Labels, session: &WidgetSession) -> String {
    let content = format!(
        "{log}{notice}{examples}{input}",
        log = chat_box(labels, session),
        notice = failure_notice(labels, session),
        examples = example_questions(session),
        input = input_form(session),
    );
    html_shell(title, &content)
}

/// Generate the HTML shell around the widget.
fn html_shell(title: &str, content: &str) -> String {
    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>
        body {{ font-family: system-ui, sans-serif; max-width: 48rem; margin: 0 auto; padding: 1rem; }}
        .chat-box {{ height: 60vh; overflow-y: auto; border: 1px solid #ccc; border-radius: 0.5rem; padding: 0.5rem 1rem; }}
        .message-user strong {{ color: #1d4ed8; }}
        .message-assistant strong {{ color: #047857; }}
        .notice {{ color: #b91c1c; }}
        .example-questions form {{ display: inline; }}
        .input-row {{ display: flex; gap: 0.5rem; margin-top: 1rem; }}
        .input-row input {{ flex: 1; padding: 0.5rem; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <main id="app">
{content}
    </main>
</body>
</html>"#
    )
}

/// The `chat-box` log. The `chat-end` anchor is present only while the log is
/// scrolled to the bottom; the input form targets it.
fn chat_box(labels: &Labels, session: &WidgetSession) -> String {
    let log = session.log();
    let anchor = if log.is_scrolled_to_bottom() {
        r#"<span id="chat-end"></span>"#
    } else {
        ""
    };
    format!(
        r#"<div id="chat-box" class="chat-box" aria-live="polite" data-scroll-top="{top}" data-scroll-height="{height}">{entries}{anchor}</div>"#,
        top = log.scroll_top(),
        height = log.scroll_height(),
        entries = log.render(labels),
    )
}

fn failure_notice(labels: &Labels, session: &WidgetSession) -> String {
    if session.last_failed().is_none() {
        return String::new();
    }
    format!(
        r#"<div class="notice" role="alert">{assistant} could not be reached. <form method="post" action="/sessions/{id}/retry#chat-end"><button type="submit">Retry</button></form></div>"#,
        assistant = escape_html(&labels.assistant),
        id = session.id(),
    )
}

fn example_questions(session: &WidgetSession) -> String {
    let hidden = if session.examples_hidden() {
        r#" hidden style="display: none""#
    } else {
        ""
    };
    let mut buttons = String::new();
    for question in ExampleQuestion::ALL {
        let _ = write!(
            buttons,
            r#"<form method="post" action="/sessions/{id}/examples/{n}#chat-end"><button type="submit">{text}</button></form>"#,
            id = session.id(),
            n = question.number(),
            text = escape_html(question.text()),
        );
    }
    format!(r#"<div id="example-questions" class="example-questions"{hidden}>{buttons}</div>"#)
}

fn input_form(session: &WidgetSession) -> String {
    format!(
        r#"<form class="input-row" method="post" action="/sessions/{id}/messages#chat-end"><input id="user-input" name="message" type="text" placeholder="Ask about the weather..." autocomplete="off" autofocus value="{value}"><button type="submit">Send</button></form>"#,
        id = session.id(),
        value = escape_html(&session.input_value()),
    )
}
