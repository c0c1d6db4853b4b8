//! `GList`: doubly-linked lists of untyped pointers.
//!
//! A `GList *` is both a node and, when it is the first node, the whole
//! list; the empty list is NULL. [`List`] owns a chain (and frees it with
//! `g_list_free`, never touching the element data). [`ListNode`] is a
//! borrowed view of a single link.

use crate::ffi::{GList, gconstpointer, gint, gpointer};
use crate::handle::{Borrowed, Handle, foreign_handle};
use crate::library::GLib;
use std::ptr;

foreign_handle! {
    /// View over one `GList` link.
    pub struct ListNode => GList;
}

impl ListNode {
    /// The `data` field.
    pub fn data(&self) -> gpointer {
        unsafe { (*self.raw.as_ptr()).data }
    }

    /// Overwrite the `data` field. The list never dereferences it.
    pub fn set_data(&self, data: gpointer) {
        unsafe { (*self.raw.as_ptr()).data = data };
    }

    /// The `next` field.
    pub fn next(&self) -> Option<Borrowed<'_, ListNode>> {
        unsafe { Borrowed::from_ptr(self.lib, (*self.raw.as_ptr()).next) }
    }

    /// Overwrite the `next` field.
    ///
    /// # Safety
    ///
    /// Can break the chain's invariants (`next.prev == self`).
    pub unsafe fn set_next(&self, next: *mut GList) {
        unsafe { (*self.raw.as_ptr()).next = next };
    }

    /// The `prev` field.
    pub fn prev(&self) -> Option<Borrowed<'_, ListNode>> {
        unsafe { Borrowed::from_ptr(self.lib, (*self.raw.as_ptr()).prev) }
    }

    /// Overwrite the `prev` field.
    ///
    /// # Safety
    ///
    /// Can break the chain's invariants (`prev.next == self`).
    pub unsafe fn set_prev(&self, prev: *mut GList) {
        unsafe { (*self.raw.as_ptr()).prev = prev };
    }
}

/// An owned `GList` chain.
pub struct List {
    head: *mut GList,
    lib: &'static GLib,
}

impl List {
    /// The empty list.
    pub fn new(lib: &'static GLib) -> Self {
        Self {
            head: ptr::null_mut(),
            lib,
        }
    }

    /// Take ownership of a chain starting at `head` (NULL is the empty
    /// list).
    ///
    /// # Safety
    ///
    /// `head` must be the first link of a chain created by `lib` that
    /// nothing else will free.
    pub unsafe fn adopt(lib: &'static GLib, head: *mut GList) -> Self {
        Self { head, lib }
    }

    /// Give up ownership of the chain without freeing it.
    pub fn into_raw(self) -> *mut GList {
        let this = std::mem::ManuallyDrop::new(self);
        this.head
    }

    pub fn as_ptr(&self) -> *mut GList {
        self.head
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_null()
    }

    /// `g_list_append`: walks the whole chain.
    pub fn append(&mut self, data: gpointer) {
        self.head = unsafe { (self.lib.g_list_append)(self.head, data) };
    }

    /// `g_list_prepend`
    pub fn prepend(&mut self, data: gpointer) {
        self.head = unsafe { (self.lib.g_list_prepend)(self.head, data) };
    }

    /// `g_list_insert`. A negative or out-of-range position appends.
    pub fn insert(&mut self, data: gpointer, position: i32) {
        self.head = unsafe { (self.lib.g_list_insert)(self.head, data, position as gint) };
    }

    /// `g_list_remove`: the first link holding `data`, if any.
    pub fn remove(&mut self, data: gconstpointer) {
        self.head = unsafe { (self.lib.g_list_remove)(self.head, data) };
    }

    /// `g_list_delete_link`
    ///
    /// # Safety
    ///
    /// `link` must be a link of this list.
    pub unsafe fn delete_link(&mut self, link: *mut GList) {
        self.head = unsafe { (self.lib.g_list_delete_link)(self.head, link) };
    }

    /// `g_list_reverse`
    pub fn reverse(&mut self) {
        self.head = unsafe { (self.lib.g_list_reverse)(self.head) };
    }

    /// `g_list_copy`: a new chain holding the same data pointers.
    pub fn copy(&self) -> List {
        let head = unsafe { (self.lib.g_list_copy)(self.head) };
        List { head, lib: self.lib }
    }

    /// `g_list_length`
    pub fn len(&self) -> u32 {
        unsafe { (self.lib.g_list_length)(self.head) }
    }

    /// `g_list_nth`
    pub fn nth(&self, n: u32) -> Option<Borrowed<'_, ListNode>> {
        let link = unsafe { (self.lib.g_list_nth)(self.head, n) };
        unsafe { Borrowed::from_ptr(self.lib, link) }
    }

    /// `g_list_nth_data`. NULL both for a NULL element and past the end.
    pub fn nth_data(&self, n: u32) -> gpointer {
        unsafe { (self.lib.g_list_nth_data)(self.head, n) }
    }

    /// `g_list_find`
    pub fn find(&self, data: gconstpointer) -> Option<Borrowed<'_, ListNode>> {
        let link = unsafe { (self.lib.g_list_find)(self.head, data) };
        unsafe { Borrowed::from_ptr(self.lib, link) }
    }

    /// `g_list_index`
    pub fn index(&self, data: gconstpointer) -> Option<u32> {
        let index = unsafe { (self.lib.g_list_index)(self.head, data) };
        u32::try_from(index).ok()
    }

    /// `g_list_first`
    pub fn first(&self) -> Option<Borrowed<'_, ListNode>> {
        let link = unsafe { (self.lib.g_list_first)(self.head) };
        unsafe { Borrowed::from_ptr(self.lib, link) }
    }

    /// `g_list_last`
    pub fn last(&self) -> Option<Borrowed<'_, ListNode>> {
        let link = unsafe { (self.lib.g_list_last)(self.head) };
        unsafe { Borrowed::from_ptr(self.lib, link) }
    }

    /// Walk the data pointers front to back through the `next` fields.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            node: unsafe { Borrowed::from_ptr(self.lib, self.head) },
        }
    }
}

impl Drop for List {
    fn drop(&mut self) {
        if !self.head.is_null() {
            log::trace!("freeing list {:p}", self.head);
            unsafe { (self.lib.g_list_free)(self.head) };
        }
    }
}

impl std::fmt::Debug for List {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

pub struct Iter<'a> {
    node: Option<Borrowed<'a, ListNode>>,
}

impl Iterator for Iter<'_> {
    type Item = gpointer;

    fn next(&mut self) -> Option<gpointer> {
        let node = self.node.take()?;
        let data = node.data();
        let next = unsafe { (*node.as_ptr()).next };
        self.node = unsafe { Borrowed::from_ptr(node.lib(), next) };
        Some(data)
    }
}
