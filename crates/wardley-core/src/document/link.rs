//! Links between map entities.

/// A dependency or flow between two named entities.
///
/// Endpoints are weak references: they are looked up by name when drawing,
/// and a link whose endpoint does not exist is simply not drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    start: String,
    end: String,
    line: usize,
    flow: Option<Flow>,
    context: Option<String>,
}

/// Flow attributes of a `+>` family link.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Flow {
    future: bool,
    past: bool,
    value: Option<String>,
}

impl Flow {
    pub fn new(future: bool, past: bool) -> Self {
        Self {
            future,
            past,
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl Link {
    /// Creates a plain `->` dependency.
    pub fn dependency(start: impl Into<String>, end: impl Into<String>, line: usize) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            line,
            flow: None,
            context: None,
        }
    }

    /// Creates a flow link.
    pub fn flow(start: impl Into<String>, end: impl Into<String>, line: usize, flow: Flow) -> Self {
        Self {
            flow: Some(flow),
            ..Self::dependency(start, end, line)
        }
    }

    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn is_flow(&self) -> bool {
        self.flow.is_some()
    }

    /// Flow pointing from start to end (`+>`, `+<>`).
    pub fn is_future(&self) -> bool {
        self.flow.as_ref().is_some_and(|f| f.future)
    }

    /// Flow pointing from end back to start (`+<`, `+<>`).
    pub fn is_past(&self) -> bool {
        self.flow.as_ref().is_some_and(|f| f.past)
    }

    /// The quoted value of a `+'value'>` flow.
    pub fn flow_value(&self) -> Option<&str> {
        self.flow.as_ref().and_then(|f| f.value.as_deref())
    }

    /// Free text after a `;` following the end name.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}
