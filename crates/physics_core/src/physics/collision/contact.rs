//! Contact points and the sinks that collect them

use crate::foundation::math::Vec3;

/// One contact between two parts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Contact point on the first part, world space
    pub point_a: Vec3,
    /// Contact point on the second part, world space
    pub point_b: Vec3,
    /// Contact normal, pointing from the second part towards the first
    pub normal: Vec3,
}

impl Contact {
    /// Signed separation along the normal; negative while penetrating
    pub fn separation(&self) -> f32 {
        (self.point_a - self.point_b).dot(&self.normal)
    }
}

/// Receives the contacts a narrow-phase algorithm emits.
///
/// Algorithms never filter, deduplicate or cap what they write; that is up to
/// the consumer.
pub trait ContactSink {
    /// Record one contact
    fn write_point(&mut self, point_a: Vec3, point_b: Vec3, normal: Vec3);
}

/// Contact sink backed by a vector, preserving emission order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactList {
    contacts: Vec<Contact>,
}

impl ContactList {
    /// Creates an empty contact list
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded contacts
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// True when nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Recorded contacts in emission order
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Iterate over recorded contacts
    pub fn iter(&self) -> std::slice::Iter<'_, Contact> {
        self.contacts.iter()
    }

    /// Forget all contacts, keeping the allocation
    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    /// Take the recorded contacts
    pub fn into_contacts(self) -> Vec<Contact> {
        self.contacts
    }
}

impl ContactSink for ContactList {
    fn write_point(&mut self, point_a: Vec3, point_b: Vec3, normal: Vec3) {
        self.contacts.push(Contact { point_a, point_b, normal });
    }
}

impl<'a> IntoIterator for &'a ContactList {
    type Item = &'a Contact;
    type IntoIter = std::slice::Iter<'a, Contact>;

    fn into_iter(self) -> Self::IntoIter {
        self.contacts.iter()
    }
}

/// Adapter that reports contacts with the two parts exchanged.
///
/// Lets an algorithm written for `(A, B)` serve the `(B, A)` ordering.
pub(crate) struct SwappedSink<'a> {
    inner: &'a mut dyn ContactSink,
}

impl<'a> SwappedSink<'a> {
    pub(crate) fn new(inner: &'a mut dyn ContactSink) -> Self {
        Self { inner }
    }
}

impl ContactSink for SwappedSink<'_> {
    fn write_point(&mut self, point_a: Vec3, point_b: Vec3, normal: Vec3) {
        self.inner.write_point(point_b, point_a, -normal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_list_preserves_order() {
        let mut list = ContactList::new();
        list.write_point(Vec3::x(), Vec3::zeros(), Vec3::z());
        list.write_point(Vec3::y(), Vec3::zeros(), Vec3::z());
        assert_eq!(list.len(), 2);
        assert_eq!(list.contacts()[0].point_a, Vec3::x());
        assert_eq!(list.contacts()[1].point_a, Vec3::y());
    }

    #[test]
    fn test_swapped_sink_exchanges_points() {
        let mut list = ContactList::new();
        SwappedSink::new(&mut list).write_point(Vec3::x(), Vec3::y(), Vec3::z());
        let contact = list.contacts()[0];
        assert_eq!(contact.point_a, Vec3::y());
        assert_eq!(contact.point_b, Vec3::x());
        assert_eq!(contact.normal, -Vec3::z());
    }

    #[test]
    fn test_separation_sign() {
        let contact = Contact {
            point_a: Vec3::new(0.0, 0.0, -0.25),
            point_b: Vec3::zeros(),
            normal: Vec3::z(),
        };
        assert!(contact.separation() < 0.0);
    }
}
