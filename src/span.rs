use std::ops::Deref;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub fn start(self) -> usize {
        self.start as usize
    }

    #[inline]
    pub fn end(self) -> usize {
        self.end as usize
    }

    #[inline]
    pub fn empty() -> Span {
        Span { start: 0, end: 0 }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// 1-based line and column of `self.start` within `src`.
    pub fn location(self, src: &str) -> (usize, usize) {
        let start = self.start().min(src.len());
        let before = &src[..start];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = src[line_start..start].chars().count() + 1;
        (line, column)
    }
}

impl From<std::ops::Range<usize>> for Span {
    #[inline]
    fn from(value: std::ops::Range<usize>) -> Self {
        Span {
            start: value.start as u32,
            end: value.end as u32,
        }
    }
}

impl From<Span> for std::ops::Range<usize> {
    #[inline]
    fn from(value: Span) -> Self {
        value.start as usize..value.end as usize
    }
}

impl std::ops::Index<Span> for str {
    type Output = <str as std::ops::Index<std::ops::Range<usize>>>::Output;

    #[inline]
    fn index(&self, index: Span) -> &Self::Output {
        self.index(std::ops::Range::from(index))
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Spanned<T> {
    inner: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    #[inline]
    pub fn new(inner: T, span: impl Into<Span>) -> Self {
        Self {
            inner,
            span: span.into(),
        }
    }

    #[inline]
    pub fn empty(inner: T) -> Self {
        Self::new(inner, Span::empty())
    }

    #[inline]
    pub fn into_inner(self) -> T {
        self.inner
    }

    #[inline]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned {
            inner: f(self.inner),
            span: self.span,
        }
    }
}

impl<'a> Spanned<&'a str> {
    /// Narrow the span to `part`, which must be a subslice of `self`.
    pub fn slice(self, part: &'a str) -> Spanned<&'a str> {
        let offset = part.as_ptr() as usize - self.inner.as_ptr() as usize;
        debug_assert!(offset + part.len() <= self.inner.len());

        let start = self.span.start() + offset;
        Spanned::new(part, start..start + part.len())
    }

    /// Same as `str::trim`, keeping track of the span.
    pub fn trim(self) -> Spanned<&'a str> {
        self.slice(self.inner.trim())
    }
}

impl<T> Deref for Spanned<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Spanned<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} @ {}", self.inner, self.span)
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Spanned<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.inner, f)
    }
}

impl<T: std::error::Error> std::error::Error for Spanned<T> {}
