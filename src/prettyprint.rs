use tracing::{Event, Subscriber};
use tracing_subscriber::{
    fmt::{
        self,
        format::{Format, FormatEvent, FormatFields, Writer},
        FmtContext,
    },
    registry::LookupSpan,
};

/// Event formatter that indents each event under the span (task, read, write...) it belongs to
/// and prefixes it with the name of the outermost span.
pub struct TaskFormatter {
    inner: Format,
}

impl TaskFormatter {
    pub fn new(ansi: bool) -> Self {
        Self {
            inner: fmt::format()
                .with_ansi(ansi)
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .with_level(true)
                .with_source_location(false),
        }
    }
}

fn indent(depth: usize) -> String {
    match depth {
        0 => String::new(),
        depth => format!("{}└─ ", "  ".repeat(depth - 1)),
    }
}

impl<S, N> FormatEvent<S, N> for TaskFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let (depth, root) = match ctx.event_scope() {
            Some(scope) => {
                let spans: Vec<_> = scope.from_root().collect();
                (spans.len(), spans.first().map(|span| span.name()))
            }
            None => (0, None),
        };

        write!(writer, "{}", indent(depth))?;
        if let Some(root) = root {
            write!(writer, "[{}] ", root)?;
        }

        self.inner.format_event(ctx, writer, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(1), "└─ ");
        assert_eq!(indent(3), "    └─ ");
    }
}
