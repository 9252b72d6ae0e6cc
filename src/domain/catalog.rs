//! Course catalog
//!
//! The catalog is the immutable, validated set of courses and their explicit
//! prerequisite edges. Validation happens once, in [`CourseCatalog::new`];
//! a catalog value that exists is always a DAG with unique codes.
//!
//! The requires-all rule of the capstone is never turned into edges. It is
//! resolved on demand by the evaluator against [`CourseCatalog::all_codes`].

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

use super::course::{Course, CourseCode};

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("Catalog contains no courses")]
    Empty,

    #[error("Duplicate course code: {0}")]
    DuplicateCode(CourseCode),

    #[error("Course {0} has semester 0 (semesters start at 1)")]
    InvalidSemester(CourseCode),

    #[error("Only one course may require all others, found {0} and {1}")]
    MultipleCapstones(CourseCode, CourseCode),

    #[error("Course {course} requires unknown course {prerequisite}")]
    UnknownPrerequisite {
        course: CourseCode,
        prerequisite: CourseCode,
    },

    #[error("Course {course} lists prerequisite {prerequisite} more than once")]
    DuplicatePrerequisite {
        course: CourseCode,
        prerequisite: CourseCode,
    },

    #[error("Course {course} cannot require {capstone}, which already requires every other course")]
    RequiresCapstone {
        course: CourseCode,
        capstone: CourseCode,
    },

    #[error("Self-dependency not allowed: {0}")]
    SelfDependency(CourseCode),

    #[error("Prerequisite cycle detected involving course {0}")]
    CycleDetected(CourseCode),

    #[error("Course not found: {0}")]
    NotFound(String),
}

impl CatalogError {
    /// Returns true for errors raised while validating a catalog definition
    pub fn is_configuration(&self) -> bool {
        !matches!(self, CatalogError::NotFound(_))
    }
}

/// Courses of one semester, in catalog order
#[derive(Debug, Clone, PartialEq)]
pub struct SemesterGroup<'a> {
    pub semester: u32,
    pub courses: Vec<&'a Course>,
}

/// Validated, immutable course catalog
#[derive(Debug, Clone)]
pub struct CourseCatalog {
    courses: Vec<Course>,

    /// Map from code to position in `courses`
    index: HashMap<CourseCode, usize>,

    /// Explicit prerequisite edges, prerequisite -> course.
    /// Node `i` is `courses[i]`; nodes are never removed.
    graph: DiGraph<usize, ()>,

    /// Position of the requires-all course, if any
    capstone: Option<usize>,
}

impl CourseCatalog {
    /// Validates the courses and builds the catalog
    pub fn new(courses: Vec<Course>) -> Result<Self, CatalogError> {
        if courses.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut index = HashMap::with_capacity(courses.len());
        let mut capstone: Option<usize> = None;

        // First pass: codes, semesters, capstone
        for (pos, course) in courses.iter().enumerate() {
            if index.insert(course.code.clone(), pos).is_some() {
                return Err(CatalogError::DuplicateCode(course.code.clone()));
            }

            if course.semester == 0 {
                return Err(CatalogError::InvalidSemester(course.code.clone()));
            }

            if course.is_capstone() {
                if let Some(first) = capstone {
                    return Err(CatalogError::MultipleCapstones(
                        courses[first].code.clone(),
                        course.code.clone(),
                    ));
                }
                capstone = Some(pos);
            }
        }

        let mut graph = DiGraph::with_capacity(courses.len(), courses.len());
        for pos in 0..courses.len() {
            graph.add_node(pos);
        }

        // Second pass: edges
        for (pos, course) in courses.iter().enumerate() {
            let mut seen = HashSet::new();

            for prereq in course.prerequisites.explicit_codes() {
                if prereq == &course.code {
                    return Err(CatalogError::SelfDependency(course.code.clone()));
                }

                if !seen.insert(prereq) {
                    return Err(CatalogError::DuplicatePrerequisite {
                        course: course.code.clone(),
                        prerequisite: prereq.clone(),
                    });
                }

                let dep_pos = index.get(prereq).copied().ok_or_else(|| {
                    CatalogError::UnknownPrerequisite {
                        course: course.code.clone(),
                        prerequisite: prereq.clone(),
                    }
                })?;

                // The capstone requires this course back through the requires-all rule
                if Some(dep_pos) == capstone {
                    return Err(CatalogError::RequiresCapstone {
                        course: course.code.clone(),
                        capstone: prereq.clone(),
                    });
                }

                graph.add_edge(NodeIndex::new(dep_pos), NodeIndex::new(pos), ());
            }
        }

        // A topological sort fails if and only if there is a cycle
        if let Err(cycle) = toposort(&graph, None) {
            let pos = graph[cycle.node_id()];
            return Err(CatalogError::CycleDetected(courses[pos].code.clone()));
        }

        Ok(Self {
            courses,
            index,
            graph,
            capstone,
        })
    }

    /// Returns the course with the given code
    pub fn lookup(&self, code: &str) -> Result<&Course, CatalogError> {
        self.get(code)
            .ok_or_else(|| CatalogError::NotFound(code.to_string()))
    }

    /// Returns the course with the given code, if present
    pub fn get(&self, code: &str) -> Option<&Course> {
        self.index.get(code).map(|&pos| &self.courses[pos])
    }

    /// Returns true if the catalog contains the code
    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// Returns all courses in catalog order
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Iterates over all courses in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Course> {
        self.courses.iter()
    }

    /// Returns the number of courses
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Always false for a constructed catalog
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Returns the requires-all course, if the catalog has one
    pub fn capstone(&self) -> Option<&Course> {
        self.capstone.map(|pos| &self.courses[pos])
    }

    /// Every course code except the capstone's own, in catalog order
    pub fn all_codes(&self) -> impl Iterator<Item = &CourseCode> {
        let capstone = self.capstone;
        self.courses
            .iter()
            .enumerate()
            .filter(move |(pos, _)| Some(*pos) != capstone)
            .map(|(_, course)| &course.code)
    }

    /// Groups courses by semester, ascending, catalog order within a group
    pub fn courses_by_semester(&self) -> Vec<SemesterGroup<'_>> {
        let mut groups: BTreeMap<u32, Vec<&Course>> = BTreeMap::new();
        for course in &self.courses {
            groups.entry(course.semester).or_default().push(course);
        }

        groups
            .into_iter()
            .map(|(semester, courses)| SemesterGroup { semester, courses })
            .collect()
    }

    /// Courses that list `code` as an explicit prerequisite, in catalog order
    pub fn dependents(&self, code: &str) -> Vec<&Course> {
        let pos = match self.index.get(code) {
            Some(pos) => *pos,
            None => return vec![],
        };

        let mut positions: Vec<usize> = self
            .graph
            .neighbors_directed(NodeIndex::new(pos), Direction::Outgoing)
            .map(|idx| self.graph[idx])
            .collect();
        positions.sort_unstable();

        positions.into_iter().map(|p| &self.courses[p]).collect()
    }

    /// Courses whose requirements include `code`: explicit dependents in
    /// catalog order, then the capstone
    pub fn unlocks(&self, code: &str) -> Vec<&Course> {
        let mut courses = self.dependents(code);
        if let Some(capstone) = self.capstone() {
            if capstone.code.as_str() != code && self.contains(code) {
                courses.push(capstone);
            }
        }
        courses
    }

    /// Course codes with every prerequisite before its dependents
    ///
    /// The capstone, having no explicit edges, is placed last.
    pub fn topological_order(&self) -> Vec<&CourseCode> {
        // Acyclicity is checked in `new`, so the sort cannot fail here
        let order = toposort(&self.graph, None).unwrap_or_default();

        let mut codes: Vec<&CourseCode> = order
            .into_iter()
            .map(|idx| self.graph[idx])
            .filter(|pos| Some(*pos) != self.capstone)
            .map(|pos| &self.courses[pos].code)
            .collect();

        if let Some(capstone) = self.capstone() {
            codes.push(&capstone.code);
        }

        codes
    }
}
