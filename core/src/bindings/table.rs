use super::{Primitive, TypeBinding, TypeRef};
use bumpalo::Bump;
use core::cell::RefCell;
use hashbrown::HashMap;

/// Interner for type bindings.
///
/// Every binding is allocated once in the arena; asking for the same type
/// twice returns the same reference, so bindings can be compared with
/// `core::ptr::eq`.
pub struct TypeTable<'t> {
    arena: &'t Bump,
    interned_strs: RefCell<HashMap<&'t str, &'t str>>,
    interned: RefCell<HashMap<TypeBinding<'t>, TypeRef<'t>>>,
}

impl<'t> TypeTable<'t> {
    pub fn new(arena: &'t Bump) -> Self {
        Self {
            arena,
            interned_strs: RefCell::new(HashMap::new()),
            interned: RefCell::new(HashMap::new()),
        }
    }

    fn intern_str(&self, s: &str) -> &'t str {
        if let Some(&interned_str) = self.interned_strs.borrow().get(s) {
            return interned_str;
        }
        let arena_str = self.arena.alloc_str(s);
        self.interned_strs.borrow_mut().insert(arena_str, arena_str);
        arena_str
    }

    fn intern(&self, binding: TypeBinding<'t>) -> TypeRef<'t> {
        if let Some(&interned) = self.interned.borrow().get(&binding) {
            return interned;
        }
        let arena_binding = self.arena.alloc(binding.clone());
        self.interned.borrow_mut().insert(binding, arena_binding);
        arena_binding
    }

    pub fn primitive(&self, primitive: Primitive) -> TypeRef<'t> {
        self.intern(TypeBinding::Primitive(primitive))
    }

    pub fn boolean(&self) -> TypeRef<'t> {
        self.primitive(Primitive::Boolean)
    }

    pub fn int(&self) -> TypeRef<'t> {
        self.primitive(Primitive::Int)
    }

    pub fn long(&self) -> TypeRef<'t> {
        self.primitive(Primitive::Long)
    }

    pub fn double(&self) -> TypeRef<'t> {
        self.primitive(Primitive::Double)
    }

    pub fn declared(&self, qualified_name: &str) -> TypeRef<'t> {
        let name = self.intern_str(qualified_name);
        self.intern(TypeBinding::Declared(name))
    }

    pub fn array(&self, elem: TypeRef<'t>) -> TypeRef<'t> {
        self.intern(TypeBinding::Array(elem))
    }

    pub fn null(&self) -> TypeRef<'t> {
        self.intern(TypeBinding::Null)
    }

    /// Resolve the textual form the external resolver reports: a primitive
    /// keyword, `null`, a qualified class name, or any of those followed by
    /// one or more `[]`.
    pub fn resolve(&self, name: &str) -> TypeRef<'t> {
        let name = name.trim();
        if let Some(elem) = name.strip_suffix("[]") {
            return self.array(self.resolve(elem));
        }
        if name == "null" {
            return self.null();
        }
        match Primitive::from_name(name) {
            Some(primitive) => self.primitive(primitive),
            None => self.declared(name),
        }
    }

    /// Number of distinct bindings interned so far.
    pub fn len(&self) -> usize {
        self.interned.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
