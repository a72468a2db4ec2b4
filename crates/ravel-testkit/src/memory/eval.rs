//! Evaluation of parsed queries over a triple list.

use std::cmp::Ordering;
use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use ravel_core::vocab::{rdf, rdfs, xsd};
use ravel_core::{BindingSet, QueryResults, Triple, Uri, Value};

use super::parse::{CompareOp, Element, Expr, Form, Group, Projection, Query, Term, TriplePattern};

type Row = IndexMap<String, Value>;

pub(crate) struct Evaluator<'d> {
    /// Asserted triples of the dataset, answered by DESCRIBE.
    asserted: &'d [Triple],
    /// Asserted plus entailed triples, matched by patterns.
    visible: Vec<Triple>,
}

impl<'d> Evaluator<'d> {
    pub fn new(asserted: &'d [Triple], inference: bool) -> Self {
        let mut visible = asserted.to_vec();
        if inference {
            entail(&mut visible);
        }
        Self { asserted, visible }
    }

    pub fn evaluate(&self, query: &Query) -> QueryResults {
        let mut rows = match &query.pattern {
            Some(group) => self.group(group, vec![Row::new()]),
            None => vec![Row::new()],
        };
        self.sort(&mut rows, &query.order);

        match &query.form {
            Form::Ask => QueryResults::Boolean(!rows.is_empty()),
            Form::Select {
                distinct,
                projection,
            } => QueryResults::Bindings(self.select(rows, *distinct, projection, query)),
            Form::Construct(template) => {
                let rows = page(rows, query);
                let mut triples = Vec::new();
                for row in &rows {
                    for pattern in template {
                        if let Some(triple) = instantiate(pattern, row) {
                            push_unique(&mut triples, triple);
                        }
                    }
                }
                QueryResults::Triples(triples)
            }
            Form::Describe(targets) => {
                let rows = page(rows, query);
                let mut described: IndexSet<Uri> = IndexSet::new();
                for row in &rows {
                    for target in targets {
                        if let Some(Value::Uri(uri)) = resolve(target, row) {
                            described.insert(uri);
                        }
                    }
                }
                let triples = self
                    .asserted
                    .iter()
                    .filter(|t| t.subject.as_uri().is_some_and(|s| described.contains(s)))
                    .cloned()
                    .fold(Vec::new(), |mut out, triple| {
                        push_unique(&mut out, triple);
                        out
                    });
                QueryResults::Triples(triples)
            }
        }
    }

    fn select(
        &self,
        rows: Vec<Row>,
        distinct: bool,
        projection: &[Projection],
        query: &Query,
    ) -> Vec<BindingSet> {
        if projection
            .iter()
            .any(|p| matches!(p, Projection::Count { .. }))
        {
            return vec![aggregate(&rows, projection)];
        }

        let mut out: Vec<BindingSet> = Vec::new();
        for row in rows {
            let bindings: BindingSet = if projection.is_empty() {
                row.into_iter()
                    .filter(|(name, _)| !name.starts_with('_'))
                    .collect()
            } else {
                projection
                    .iter()
                    .filter_map(|p| match p {
                        Projection::Variable(name) => {
                            row.get(name).map(|v| (name.clone(), v.clone()))
                        }
                        Projection::Count { .. } => None,
                    })
                    .collect()
            };
            if distinct && out.contains(&bindings) {
                continue;
            }
            out.push(bindings);
        }
        page(out, query)
    }

    fn group(&self, group: &Group, input: Vec<Row>) -> Vec<Row> {
        let mut rows = input;
        let mut filters = Vec::new();
        for element in group {
            rows = match element {
                Element::Triple(pattern) => rows
                    .iter()
                    .flat_map(|row| self.matches(pattern, row))
                    .collect(),
                Element::Optional(optional) => rows
                    .into_iter()
                    .flat_map(|row| {
                        let extended = self.group(optional, vec![row.clone()]);
                        if extended.is_empty() {
                            vec![row]
                        } else {
                            extended
                        }
                    })
                    .collect(),
                Element::Group(nested) => self.group(nested, rows),
                Element::Filter(expr) => {
                    filters.push(expr);
                    rows
                }
            };
        }
        rows.retain(|row| filters.iter().all(|f| truthy(eval(f, row).as_ref())));
        rows
    }

    fn matches(&self, pattern: &TriplePattern, row: &Row) -> Vec<Row> {
        self.visible
            .iter()
            .filter_map(|triple| {
                let mut row = row.clone();
                let predicate = Value::Uri(triple.predicate.clone());
                (unify(&pattern.subject, &triple.subject, &mut row)
                    && unify(&pattern.predicate, &predicate, &mut row)
                    && unify(&pattern.object, &triple.object, &mut row))
                .then_some(row)
            })
            .collect()
    }

    fn sort(&self, rows: &mut [Row], order: &[(Expr, bool)]) {
        if order.is_empty() {
            return;
        }
        rows.sort_by(|a, b| {
            for (key, descending) in order {
                let ordering = compare_terms(eval(key, a).as_ref(), eval(key, b).as_ref());
                let ordering = if *descending {
                    ordering.reverse()
                } else {
                    ordering
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }
}

fn page<T>(items: Vec<T>, query: &Query) -> Vec<T> {
    items
        .into_iter()
        .skip(query.offset.unwrap_or(0))
        .take(query.limit.unwrap_or(usize::MAX))
        .collect()
}

fn aggregate(rows: &[Row], projection: &[Projection]) -> BindingSet {
    let mut out = BindingSet::new();
    for item in projection {
        let Projection::Count {
            distinct,
            variable,
            alias,
        } = item
        else {
            continue;
        };
        let count = match variable {
            None => rows.len(),
            Some(name) => {
                let values = rows.iter().filter_map(|row| row.get(name));
                if *distinct {
                    values.fold(Vec::new(), |mut seen: Vec<&Value>, value| {
                        if !seen.contains(&value) {
                            seen.push(value);
                        }
                        seen
                    })
                    .len()
                } else {
                    values.count()
                }
            }
        };
        out.insert(
            alias.clone(),
            Value::from_literal(&count.to_string(), Some(xsd::INTEGER), None),
        );
    }
    out
}

fn unify(term: &Term, value: &Value, row: &mut Row) -> bool {
    match term {
        Term::Const(constant) => constant == value,
        Term::Var(name) => match row.get(name) {
            Some(bound) => bound == value,
            None => {
                row.insert(name.clone(), value.clone());
                true
            }
        },
    }
}

fn resolve(term: &Term, row: &Row) -> Option<Value> {
    match term {
        Term::Const(value) => Some(value.clone()),
        Term::Var(name) => row.get(name).cloned(),
    }
}

fn instantiate(pattern: &TriplePattern, row: &Row) -> Option<Triple> {
    let subject = resolve(&pattern.subject, row)?;
    let Value::Uri(predicate) = resolve(&pattern.predicate, row)? else {
        return None;
    };
    let object = resolve(&pattern.object, row)?;
    matches!(subject, Value::Uri(_) | Value::BlankNode(_))
        .then(|| Triple::new(subject, predicate, object))
}

fn push_unique(triples: &mut Vec<Triple>, triple: Triple) {
    if !triples.contains(&triple) {
        triples.push(triple);
    }
}

/// Add `rdf:type` statements implied by the `rdfs:subClassOf` closure.
fn entail(triples: &mut Vec<Triple>) {
    let sub_class_of = Uri::new(rdfs::SUB_CLASS_OF);
    let rdf_type = Uri::new(rdf::TYPE);

    let mut supers: IndexMap<Uri, Vec<Uri>> = IndexMap::new();
    for triple in triples.iter().filter(|t| t.predicate == sub_class_of) {
        if let (Some(sub), Some(sup)) = (triple.subject.as_uri(), triple.object.as_uri()) {
            supers.entry(sub.clone()).or_default().push(sup.clone());
        }
    }

    let typed: Vec<(Value, Uri)> = triples
        .iter()
        .filter(|t| t.predicate == rdf_type)
        .filter_map(|t| Some((t.subject.clone(), t.object.as_uri()?.clone())))
        .collect();

    for (subject, class) in typed {
        let mut seen: IndexSet<Uri> = IndexSet::from([class.clone()]);
        let mut queue = VecDeque::from([class]);
        while let Some(current) = queue.pop_front() {
            for sup in supers.get(&current).into_iter().flatten() {
                if seen.insert(sup.clone()) {
                    queue.push_back(sup.clone());
                    push_unique(triples, Triple::new(subject.clone(), rdf_type.clone(), sup.clone()));
                }
            }
        }
    }
}

fn eval(expr: &Expr, row: &Row) -> Option<Value> {
    match expr {
        Expr::Term(term) => resolve(term, row),
        Expr::Not(inner) => Some(Value::Boolean(!truthy(eval(inner, row).as_ref()))),
        Expr::And(left, right) => Some(Value::Boolean(
            truthy(eval(left, row).as_ref()) && truthy(eval(right, row).as_ref()),
        )),
        Expr::Or(left, right) => Some(Value::Boolean(
            truthy(eval(left, row).as_ref()) || truthy(eval(right, row).as_ref()),
        )),
        Expr::Compare(op, left, right) => {
            let left = eval(left, row)?;
            let right = eval(right, row)?;
            let ordering = compare_values(&left, &right);
            let result = match op {
                CompareOp::Eq => ordering == Some(Ordering::Equal),
                CompareOp::Ne => ordering != Some(Ordering::Equal),
                CompareOp::Lt => ordering == Some(Ordering::Less),
                CompareOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
                CompareOp::Gt => ordering == Some(Ordering::Greater),
                CompareOp::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
            };
            Some(Value::Boolean(result))
        }
        Expr::Call(name, args) => call(name, args, row),
    }
}

fn call(name: &str, args: &[Expr], row: &Row) -> Option<Value> {
    if name == "BOUND" {
        let [Expr::Term(Term::Var(variable))] = args else {
            return None;
        };
        return Some(Value::Boolean(row.contains_key(variable)));
    }

    let values: Vec<Value> = args.iter().map(|a| eval(a, row)).collect::<Option<_>>()?;
    match (name, values.as_slice()) {
        ("STR", [value]) => Some(Value::String(lexical(value))),
        ("LANG", [value]) => Some(Value::String(match value {
            Value::LangString { lang, .. } => lang.clone(),
            _ => String::new(),
        })),
        ("LCASE", [value]) => Some(Value::String(lexical(value).to_lowercase())),
        ("UCASE", [value]) => Some(Value::String(lexical(value).to_uppercase())),
        ("CONTAINS", [haystack, needle]) => Some(Value::Boolean(
            lexical(haystack).contains(&lexical(needle)),
        )),
        _ => None,
    }
}

fn lexical(value: &Value) -> String {
    match value {
        Value::Uri(uri) => uri.as_str().to_owned(),
        Value::String(s) | Value::LangString { value: s, .. } => s.clone(),
        Value::BlankNode(label) => format!("_:{label}"),
        other => other.lexical_form().unwrap_or_default(),
    }
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        None => false,
        Some(Value::Boolean(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(other) => other.as_f64().map_or(true, |n| n != 0.0 && !n.is_nan()),
    }
}

/// Numbers by value, plain strings and URIs by text, anything else only
/// for equality.
fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Some(l), Some(r)) = (numeric(left), numeric(right)) {
        return l.partial_cmp(&r);
    }
    match (left, right) {
        (Value::Uri(l), Value::Uri(r)) => Some(l.as_str().cmp(r.as_str())),
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        _ if left == right => Some(Ordering::Equal),
        _ if std::mem::discriminant(left) == std::mem::discriminant(right) => {
            Some(lexical(left).cmp(&lexical(right)))
        }
        _ => None,
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Typed { lexical, datatype } if datatype.as_str().starts_with(xsd::NAMESPACE) => {
            lexical.parse().ok()
        }
        Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Double(_) | Value::Decimal(_) => {
            value.as_f64()
        }
        _ => None,
    }
}

/// Total order for ORDER BY: unbound first, then numbers, then by text.
fn compare_terms(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(l), Some(r)) => compare_values(l, r)
            .unwrap_or_else(|| lexical(l).cmp(&lexical(r))),
    }
}
