use std::any::{Any, TypeId};
use std::sync::Arc;

/// One value recorded on a `Blackboard`, in insertion order.
#[derive(Clone)]
struct Entry {
    seq: u64,
    binding_name: Option<String>,
    type_id: TypeId,
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

/// Ordered, type-queryable object store shared by an agent process and the
/// actions it runs.
///
/// Every write is appended with a monotonic sequence number, so "last of
/// type T" and "last bound to name N" both mean "most recently written".
/// A write that reuses an existing `(binding_name, type)` pair replaces the
/// earlier entry in place (de-duplication); an unbound write (`add`) is
/// always appended, never de-duplicated.
#[derive(Clone, Default)]
pub struct Blackboard {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value with no binding name. Always appended.
    pub fn add<T: Any + Send + Sync>(&mut self, value: T) {
        self.add_inner(None, value);
    }

    /// Record a value under a binding name, replacing any existing entry
    /// with the same name and type.
    pub fn bind<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.add_inner(Some(name.into()), value);
    }

    fn add_inner<T: Any + Send + Sync>(&mut self, binding_name: Option<String>, value: T) {
        let type_id = TypeId::of::<T>();
        if let Some(name) = &binding_name {
            self.entries
                .retain(|e| !(e.binding_name.as_deref() == Some(name.as_str()) && e.type_id == type_id));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            seq,
            binding_name,
            type_id,
            type_name: std::any::type_name::<T>(),
            value: Arc::new(value),
        });
    }

    /// Most recent value bound to `name`, of type `T`.
    pub fn by_name<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.binding_name.as_deref() == Some(name) && e.type_id == TypeId::of::<T>())
            .and_then(|e| e.value.clone().downcast::<T>().ok())
    }

    /// Most recent value of type `T`, regardless of binding name.
    pub fn last_of_type<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.type_id == TypeId::of::<T>())
            .and_then(|e| e.value.clone().downcast::<T>().ok())
    }

    /// Resolve an action input: prefer a value bound to `name`, falling back
    /// to the last value of type `T` written under any name.
    pub fn resolve<T: Any + Send + Sync>(&self, name: Option<&str>) -> Option<Arc<T>> {
        if let Some(name) = name {
            if let Some(value) = self.by_name::<T>(name) {
                return Some(value);
            }
        }
        self.last_of_type::<T>()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Type names present, in write order, for diagnostics.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.type_name)
    }

    /// A cheap (reference-counted) snapshot that can diverge independently:
    /// writes made to the child are not visible to this blackboard, and
    /// vice versa.
    pub fn spawn_child(&self) -> Blackboard {
        self.clone()
    }

    /// Binding names of entries written after `baseline_len`, in write
    /// order. Used by a concurrent driver to detect two actions dispatched
    /// from the same snapshot writing the same binding name in one tick,
    /// before either's writes are merged back.
    pub fn suffix_binding_names(&self, baseline_len: usize) -> Vec<Option<String>> {
        let start = baseline_len.min(self.entries.len());
        self.entries[start..].iter().map(|e| e.binding_name.clone()).collect()
    }

    /// Appends the entries `other` accumulated after `baseline_len` onto
    /// `self`, renumbering them into this blackboard's own sequence space.
    /// `other` is expected to have started as a clone of `self` at
    /// `baseline_len`; entries before that point are not touched.
    pub fn merge_suffix(&mut self, other: &Blackboard, baseline_len: usize) {
        let start = baseline_len.min(other.entries.len());
        for entry in &other.entries[start..] {
            if let Some(name) = &entry.binding_name {
                self.entries
                    .retain(|e| !(e.binding_name.as_deref() == Some(name.as_str()) && e.type_id == entry.type_id));
            }
            let seq = self.next_seq;
            self.next_seq += 1;
            self.entries.push(Entry {
                seq,
                ..entry.clone()
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_name_takes_precedence_over_last_of_type() {
        let mut bb = Blackboard::new();
        bb.add(1_i32);
        bb.bind("count", 2_i32);
        bb.add(3_i32);

        assert_eq!(*bb.resolve::<i32>(Some("count")).unwrap(), 2);
        assert_eq!(*bb.resolve::<i32>(None).unwrap(), 3);
        assert_eq!(*bb.resolve::<i32>(Some("missing")).unwrap(), 3);
    }

    #[test]
    fn rebinding_same_name_and_type_replaces_not_appends() {
        let mut bb = Blackboard::new();
        bb.bind("x", 1_i32);
        bb.bind("x", 2_i32);
        assert_eq!(bb.len(), 1);
        assert_eq!(*bb.by_name::<i32>("x").unwrap(), 2);
    }

    #[test]
    fn unbound_writes_are_never_deduplicated() {
        let mut bb = Blackboard::new();
        bb.add("a".to_string());
        bb.add("a".to_string());
        assert_eq!(bb.len(), 2);
    }

    #[test]
    fn merge_suffix_brings_in_only_entries_written_after_the_baseline() {
        let mut shared = Blackboard::new();
        shared.bind("count", 1_i32);
        let baseline = shared.len();

        let mut branch = shared.spawn_child();
        branch.bind("result", 42_i32);

        shared.merge_suffix(&branch, baseline);
        assert_eq!(*shared.by_name::<i32>("result").unwrap(), 42);
        assert_eq!(*shared.by_name::<i32>("count").unwrap(), 1);
    }

    #[test]
    fn suffix_binding_names_reports_only_new_writes() {
        let mut bb = Blackboard::new();
        bb.bind("a", 1_i32);
        let baseline = bb.len();
        bb.bind("b", 2_i32);
        bb.add(3_i32);

        let names = bb.suffix_binding_names(baseline);
        assert_eq!(names, vec![Some("b".to_string()), None]);
    }

    #[test]
    fn child_scope_does_not_leak_back_to_parent() {
        let mut parent = Blackboard::new();
        parent.bind("x", 1_i32);
        let mut child = parent.spawn_child();
        child.bind("x", 2_i32);
        assert_eq!(*parent.by_name::<i32>("x").unwrap(), 1);
        assert_eq!(*child.by_name::<i32>("x").unwrap(), 2);
    }
}
