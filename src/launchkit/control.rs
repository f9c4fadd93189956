//! # Controls
//!
//! A [`Control`] is a one-way, push-based binding from a source
//! [`Attribute`] to a destination attribute. Its mapping runs once when the
//! control is built and once per value-changed notification of the source
//! afterwards. Building a control therefore always writes the destination
//! before returning.
//!
//! Controls hold strong handles to both attributes; the subscription they
//! install holds weak ones, so a control never forms an `Rc` cycle with its
//! source. Dropping the control disconnects it.
//!
//! Chains of controls form a dataflow graph. Plain [`Control::bind`] does not
//! look for cycles: a loop that keeps producing new values recurses until the
//! stack runs out, a loop that converges stops on its own. [`BindGraph`]
//! rejects cycles when the binding is built.

use crate::attribute::{AttrId, Attribute};
use crate::error::{LaunchError, Result};
use crate::signal::Subscription;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

type Mapping<S, D> = Rc<dyn Fn(&Attribute<S>, &Attribute<D>)>;

pub struct Control<S, D> {
    source: Attribute<S>,
    destination: Attribute<D>,
    _subscription: Subscription,
}

impl<S, D> Control<S, D>
where
    S: Clone + PartialEq + 'static,
    D: Clone + PartialEq + 'static,
{
    pub fn bind(
        source: &Attribute<S>,
        destination: &Attribute<D>,
        mapping: impl Fn(&Attribute<S>, &Attribute<D>) + 'static,
    ) -> Self {
        let mapping: Mapping<S, D> = Rc::new(mapping);
        mapping(source, destination);

        let weak_src = source.downgrade();
        let weak_dst = destination.downgrade();
        let subscription = source.connect_value_changed(move |_| {
            if let (Some(src), Some(dst)) = (weak_src.upgrade(), weak_dst.upgrade()) {
                mapping(&src, &dst);
            }
        });

        Self {
            source: source.clone(),
            destination: destination.clone(),
            _subscription: subscription,
        }
    }

    /// Derive the destination value from the source value.
    pub fn map(
        source: &Attribute<S>,
        destination: &Attribute<D>,
        f: impl Fn(&S) -> D + 'static,
    ) -> Self {
        Self::bind(source, destination, move |src, dst| {
            let value = src.with(&f);
            dst.set_value(value);
        })
    }

    pub fn source(&self) -> &Attribute<S> {
        &self.source
    }

    pub fn destination(&self) -> &Attribute<D> {
        &self.destination
    }
}

impl<T: Clone + PartialEq + 'static> Control<T, T> {
    /// Copy the source value into the destination.
    pub fn identity(source: &Attribute<T>, destination: &Attribute<T>) -> Self {
        Self::bind(source, destination, |src, dst| {
            dst.set_value(src.value());
        })
    }
}

/// Tracks source → destination edges and refuses bindings that would close a
/// cycle.
#[derive(Debug, Default)]
pub struct BindGraph {
    edges: HashMap<AttrId, Vec<AttrId>>,
}

impl BindGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind<S, D>(
        &mut self,
        source: &Attribute<S>,
        destination: &Attribute<D>,
        mapping: impl Fn(&Attribute<S>, &Attribute<D>) + 'static,
    ) -> Result<Control<S, D>>
    where
        S: Clone + PartialEq + 'static,
        D: Clone + PartialEq + 'static,
    {
        self.add_edge(source.id(), destination.id())?;
        Ok(Control::bind(source, destination, mapping))
    }

    pub fn identity<T>(
        &mut self,
        source: &Attribute<T>,
        destination: &Attribute<T>,
    ) -> Result<Control<T, T>>
    where
        T: Clone + PartialEq + 'static,
    {
        self.add_edge(source.id(), destination.id())?;
        Ok(Control::identity(source, destination))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    fn add_edge(&mut self, from: AttrId, to: AttrId) -> Result<()> {
        if from == to || self.reaches(to, from) {
            tracing::warn!(?from, ?to, "rejected cyclic binding");
            return Err(LaunchError::CyclicBinding);
        }
        self.edges.entry(from).or_default().push(to);
        Ok(())
    }

    fn reaches(&self, start: AttrId, target: AttrId) -> bool {
        let mut stack = vec![start];
        let mut seen = HashSet::new();
        while let Some(node) = stack.pop() {
            if node == target {
                return true;
            }
            if !seen.insert(node) {
                continue;
            }
            if let Some(next) = self.edges.get(&node) {
                stack.extend(next.iter().copied());
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::Status;
    use std::cell::{Cell, RefCell};

    #[test]
    fn bind_initializes_destination_even_for_default_source() {
        let src: Attribute<i32> = Attribute::default();
        let dst = Attribute::new(42);
        let _c = Control::identity(&src, &dst);
        assert_eq!(dst.value(), 0);
    }

    #[test]
    fn mapping_runs_once_at_bind_and_once_per_change() {
        let src = Attribute::new(1i32);
        let dst = Attribute::new(String::new());
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let _control = Control::bind(&src, &dst, move |s, d| {
            c.set(c.get() + 1);
            d.set_value(format!("#{}", s.value()));
        });
        assert_eq!(calls.get(), 1);
        assert_eq!(dst.value(), "#1");

        src.set_value(1);
        assert_eq!(calls.get(), 1);

        src.set_value(2);
        assert_eq!(calls.get(), 2);
        assert_eq!(dst.value(), "#2");
    }

    #[test]
    fn mapping_may_drive_status() {
        let connected = Attribute::new(false);
        let label = Attribute::new(String::from("Network"));
        let _control = Control::bind(&connected, &label, |src, dst| {
            dst.set_status(if src.value() {
                Status::Active
            } else {
                Status::Inactive
            });
        });
        assert_eq!(label.status(), Status::Inactive);
        connected.set_value(true);
        assert_eq!(label.status(), Status::Active);
    }

    #[test]
    fn chains_resolve_depth_first() {
        let a = Attribute::new(1i32);
        let b = Attribute::new(0i32);
        let c = Attribute::new(0i64);
        let order = Rc::new(RefCell::new(Vec::new()));

        let _ab = Control::map(&a, &b, |v| v * 10);
        let _bc = Control::map(&b, &c, |v| i64::from(*v) + 1);
        let o = Rc::clone(&order);
        let _watch = c.connect_value_changed(move |v| o.borrow_mut().push(*v));

        a.set_value(2);
        assert_eq!(b.value(), 20);
        assert_eq!(c.value(), 21);
        assert_eq!(*order.borrow(), vec![21]);
    }

    #[test]
    fn dropping_control_stops_updates() {
        let src = Attribute::new(0i32);
        let dst = Attribute::new(0i32);
        let control = Control::identity(&src, &dst);
        src.set_value(1);
        drop(control);
        src.set_value(2);
        assert_eq!(dst.value(), 1);
    }

    #[test]
    fn converging_cycle_settles() {
        let a = Attribute::new(0i32);
        let b = Attribute::new(0i32);
        let _ab = Control::map(&a, &b, |v| (*v).min(5));
        let _ba = Control::map(&b, &a, |v| *v);
        a.set_value(9);
        assert_eq!(b.value(), 5);
        assert_eq!(a.value(), 5);
    }

    #[test]
    fn bind_graph_rejects_cycles() {
        let a = Attribute::new(0i32);
        let b = Attribute::new(0i32);
        let c = Attribute::new(0i32);
        let mut graph = BindGraph::new();

        let _ab = graph.identity(&a, &b).unwrap();
        let _bc = graph.identity(&b, &c).unwrap();
        assert!(matches!(
            graph.identity(&c, &a),
            Err(LaunchError::CyclicBinding)
        ));
        assert!(matches!(
            graph.identity(&a, &a),
            Err(LaunchError::CyclicBinding)
        ));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn bind_graph_allows_diamonds() {
        let top = Attribute::new(1i32);
        let left = Attribute::new(0i32);
        let right = Attribute::new(0i32);
        let bottom = Attribute::new(0i32);
        let mut graph = BindGraph::new();

        let _a = graph.identity(&top, &left).unwrap();
        let _b = graph.identity(&top, &right).unwrap();
        let _c = graph.identity(&left, &bottom).unwrap();
        let _d = graph
            .bind(&right, &bottom, |s, d| {
                d.set_value(s.value() + d.value());
            })
            .unwrap();
        assert_eq!(bottom.value(), 2);
    }
}
