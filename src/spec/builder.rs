//! Specification generation
//!
//! Classifies the fields of a record layout, tracks the same-as dependencies
//! between them and assembles the immutable [`FitSpecBase`].

use crate::depgraph::DependencyGraph;
use crate::error::{FitParamsError, Result};
use crate::fields::{FieldKind, RecordLayout};
use crate::spec::fit_spec::FitSpecBase;
use crate::spec::resolver::{DefaultResolver, DependentResolver};
use ndarray::Array1;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

/// Build a dense bounds array from the bounds set at fitting-vector positions
fn process_bounds(set_bounds: &BTreeMap<usize, f64>, num_params: usize, fill: f64) -> Option<Array1<f64>> {
    if set_bounds.is_empty() {
        return None;
    }
    let mut result = Array1::from_elem(num_params, fill);
    for (&index, &value) in set_bounds {
        result[index] = value;
    }
    Some(result)
}

impl FitSpecBase {
    /// Generate the fit specification for a record layout
    ///
    /// # Arguments
    ///
    /// * `layout` - The field declarations of the record type
    ///
    /// # Returns
    ///
    /// The specification, or an error if the same-as declarations are invalid:
    /// [`FitParamsError::InvalidDependency`] for a field that is the same as
    /// itself, [`FitParamsError::CircularDependency`] for a cycle of any length
    /// and [`FitParamsError::UnknownField`] for a target that is not a field of
    /// the layout. No partial specification is produced on failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use fitparams_rs::fields::{FieldDecl, RecordLayout};
    /// use fitparams_rs::spec::FitSpecBase;
    ///
    /// let layout = RecordLayout::new(vec![
    ///     FieldDecl::regular("a"),
    ///     FieldDecl::same_as("b", "a"),
    ///     FieldDecl::constant("c", 7.0),
    /// ])
    /// .unwrap();
    ///
    /// let spec = FitSpecBase::generate(&layout).unwrap();
    /// assert_eq!(spec.fitting_params(), ["a"]);
    /// assert_eq!(spec.special_param_count(), 3);
    ///
    /// let defaults = spec.default_values().unwrap();
    /// assert_eq!(defaults["a"], 0.0);
    /// assert_eq!(defaults["b"], 0.0);
    /// assert_eq!(defaults["c"], 7.0);
    /// ```
    pub fn generate(layout: &RecordLayout) -> Result<Self> {
        let mut depgraph: Option<DependencyGraph> = None;

        let mut field_kinds = Vec::with_capacity(layout.len());
        let mut special_fields: Vec<String> = Vec::with_capacity(layout.len());
        let mut fitting_fields: Vec<String> = Vec::new();
        let mut default_resolvers: Vec<DefaultResolver> = Vec::with_capacity(layout.len());
        let mut set_lower_bounds: BTreeMap<usize, f64> = BTreeMap::new();
        let mut set_upper_bounds: BTreeMap<usize, f64> = BTreeMap::new();
        let mut dep_resolver_map: HashMap<String, DependentResolver> = HashMap::new();
        let mut const_values = Vec::new();

        for decl in layout.iter() {
            let name = decl.name.as_str();
            special_fields.push(decl.name.clone());
            field_kinds.push((decl.name.clone(), decl.kind.clone()));

            let resolver = match &decl.kind {
                FieldKind::Regular => {
                    fitting_fields.push(decl.name.clone());
                    match decl.default {
                        Some(value) => DefaultResolver::Fixed(value),
                        None => DefaultResolver::Unset,
                    }
                }
                FieldKind::Bounded(bounds) => {
                    let position = fitting_fields.len();
                    if bounds.has_lower_bound() {
                        set_lower_bounds.insert(position, bounds.min);
                    }
                    if bounds.has_upper_bound() {
                        set_upper_bounds.insert(position, bounds.max);
                    }
                    fitting_fields.push(decl.name.clone());
                    DefaultResolver::Fixed(bounds.resolve_default(decl.default))
                }
                FieldKind::Const(value) => {
                    const_values.push((decl.name.clone(), *value));
                    DefaultResolver::Fixed(*value)
                }
                FieldKind::SameAs(target) => {
                    let graph =
                        depgraph.get_or_insert_with(|| DependencyGraph::new(layout.names()));
                    graph.add_dependency(name, target)?;
                    dep_resolver_map.insert(decl.name.clone(), DependentResolver::new(name, target));
                    DefaultResolver::CopyFrom(target.clone())
                }
            };
            default_resolvers.push(resolver);
        }

        let num_special_params = special_fields.len();

        let (init_order, default_resolvers, dependent_resolvers) =
            match depgraph.filter(|graph| graph.dependency_count() > 0) {
                None => (special_fields, default_resolvers, Vec::new()),
                Some(graph) => {
                    if let Some(fields) = graph.find_cycle() {
                        return Err(FitParamsError::CircularDependency { fields });
                    }
                    let init_order = graph.init_order()?;

                    let mut by_name: HashMap<String, DefaultResolver> =
                        special_fields.into_iter().zip(default_resolvers).collect();
                    let ordered_resolvers = init_order
                        .iter()
                        .map(|field| {
                            by_name
                                .remove(field)
                                .ok_or_else(|| FitParamsError::UnknownField {
                                    name: field.clone(),
                                })
                        })
                        .collect::<Result<Vec<_>>>()?;

                    let dependent_resolvers = init_order
                        .iter()
                        .filter_map(|field| dep_resolver_map.remove(field))
                        .collect();

                    trace!(init_order = ?init_order, "resolved field initialization order");
                    (init_order, ordered_resolvers, dependent_resolvers)
                }
            };

        let num_fitting_params = fitting_fields.len();
        let lower_bounds = process_bounds(&set_lower_bounds, num_fitting_params, f64::NEG_INFINITY);
        let upper_bounds = process_bounds(&set_upper_bounds, num_fitting_params, f64::INFINITY);

        debug!(
            fields = num_special_params,
            fitting = num_fitting_params,
            dependent = dependent_resolvers.len(),
            constant = const_values.len(),
            "generated fit specification"
        );

        Ok(Self {
            special_param_count: num_special_params,
            init_order,
            fitting_params: fitting_fields,
            field_kinds,
            default_resolvers,
            lower_bounds,
            upper_bounds,
            dependent_resolvers,
            const_values,
        })
    }
}
