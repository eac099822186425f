/// Opaque callback binding for a host runtime.
///
/// A cell or grid can carry the handle of a host-side object together with
/// the identifier of the method to invoke on it, so an external dispatcher
/// can route engine events across a language boundary. Both values are
/// pointer-sized words the engine stores without interpreting or
/// validating them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HostBinding {
    handle: usize,
    method: usize,
}

impl HostBinding {
    pub const fn new(handle: usize, method: usize) -> Self {
        Self { handle, method }
    }

    pub const fn handle(&self) -> usize {
        self.handle
    }

    pub const fn method(&self) -> usize {
        self.method
    }

    pub fn set_handle(&mut self, handle: usize) {
        self.handle = handle;
    }

    pub fn set_method(&mut self, method: usize) {
        self.method = method;
    }
}
