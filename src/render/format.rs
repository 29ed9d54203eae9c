//! Two-phase argument formatting.
//!
//! 1. When the first argument is a string containing `%`, its placeholders
//!    consume the following arguments left to right.
//! 2. Every argument not consumed in phase 1 is rendered on its own and the
//!    pieces are joined with a single space, in call order.
//!
//! Placeholders: `%s` (text), `%d` / `%f` (number), `%i` (integer),
//! `%j` (JSON), `%o` / `%O` (inspected), `%c` (consumed, prints nothing),
//! `%%` (a literal `%`). A placeholder with no argument left stays as written.

use super::inspect::{RenderOptions, render};
use crate::domain::LogValue;
use crate::domain::value::number_to_string;

pub fn format_arguments(args: &[LogValue], options: &RenderOptions) -> String {
    let mut parts = Vec::with_capacity(args.len());
    let mut rest = args;

    if let Some((LogValue::Str(first), tail)) = args.split_first()
        && first.contains('%')
    {
        let (text, consumed) = interpolate(first, tail, options);
        parts.push(text);
        rest = &tail[consumed..];
    }

    parts.extend(rest.iter().map(|value| render(value, options)));
    parts.join(" ")
}

fn interpolate(format: &str, args: &[LogValue], options: &RenderOptions) -> (String, usize) {
    let mut out = String::with_capacity(format.len());
    let mut consumed = 0;
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let Some(&directive) = chars.peek() else {
            out.push('%');
            break;
        };

        if directive == '%' {
            chars.next();
            out.push('%');
            continue;
        }

        if !matches!(directive, 's' | 'd' | 'i' | 'f' | 'j' | 'o' | 'O' | 'c') {
            out.push('%');
            continue;
        }

        chars.next();
        let Some(arg) = args.get(consumed) else {
            out.push('%');
            out.push(directive);
            continue;
        };
        consumed += 1;

        match directive {
            's' => out.push_str(&as_text(arg, options)),
            'd' | 'f' => out.push_str(&number_to_string(to_number(arg))),
            'i' => out.push_str(&number_to_string(to_number(arg).trunc())),
            'j' => out.push_str(
                &serde_json::to_string(&arg.to_json()).unwrap_or_else(|_| "undefined".to_string()),
            ),
            'o' | 'O' => {
                let inspect = RenderOptions {
                    quote_strings: true,
                    ..options.clone()
                };
                out.push_str(&render(arg, &inspect));
            }
            _ => {}
        }
    }

    (out, consumed)
}

fn as_text(value: &LogValue, options: &RenderOptions) -> String {
    match value.canonical_text() {
        Some(text) => text,
        None => render(
            value,
            &RenderOptions {
                quote_strings: false,
                ..options.clone()
            },
        ),
    }
}

fn to_number(value: &LogValue) -> f64 {
    match value {
        LogValue::Number(n) => *n,
        LogValue::Bool(b) => f64::from(u8::from(*b)),
        LogValue::Null => 0.0,
        LogValue::Str(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        LogValue::Date(date) => date.timestamp_millis() as f64,
        _ => f64::NAN,
    }
}
