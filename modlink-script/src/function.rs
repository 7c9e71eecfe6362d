use std::collections::BTreeMap;

use crate::call::CallContext;

/// A native entry point callable from scripts.
///
/// Returns the number of results; 0 means the call failed and a diagnostic
/// was recorded on the context.
pub trait NativeFunction<H: ?Sized> {
    fn call(&self, host: &mut H, ctx: &mut CallContext<'_>) -> usize;
}

/// Adapts a plain function or closure into a [`NativeFunction`].
pub struct FnEntry<F>(pub F);

impl<H: ?Sized, F> NativeFunction<H> for FnEntry<F>
where
    F: Fn(&mut H, &mut CallContext<'_>) -> usize,
{
    fn call(&self, host: &mut H, ctx: &mut CallContext<'_>) -> usize {
        (self.0)(host, ctx)
    }
}

/// Exported name to entry point.
pub struct FunctionTable<H: ?Sized> {
    functions: BTreeMap<String, Box<dyn NativeFunction<H>>>,
}

impl<H: ?Sized> Default for FunctionTable<H> {
    fn default() -> Self {
        Self {
            functions: BTreeMap::new(),
        }
    }
}

impl<H: ?Sized> FunctionTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`. Binding a name again replaces the previous entry point.
    pub fn bind(&mut self, name: &str, f: impl NativeFunction<H> + 'static) {
        if self.functions.insert(name.to_string(), Box::new(f)).is_some() {
            log::warn!("function '{}' rebound", name);
        }
    }

    pub fn bind_fn<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&mut H, &mut CallContext<'_>) -> usize + 'static,
    {
        self.bind(name, FnEntry(f));
    }

    pub fn get(&self, name: &str) -> Option<&dyn NativeFunction<H>> {
        self.functions.get(name).map(|f| f.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Dispatch to `name`. `None` when nothing is bound under that name.
    pub fn call(&self, name: &str, host: &mut H, ctx: &mut CallContext<'_>) -> Option<usize> {
        let f = self.functions.get(name)?;
        Some(f.call(host, ctx))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
