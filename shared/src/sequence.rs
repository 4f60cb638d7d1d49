//! 有序列表模块
//!
//! `SequencedList` 取代手工的数组位移：插入 / 删除都在内部完成，
//! 并保证元素的序号始终为 `1..=len`，没有空洞。

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 可被编号的元素
///
/// 没有编号字段的元素（例如遭遇）使用默认实现即可，顺序由位置决定。
pub trait Sequenced {
    fn sequence(&self) -> Option<u32> {
        None
    }

    fn set_sequence(&mut self, _sequence: u32) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequencedList<T> {
    items: Vec<T>,
}

impl<T> Default for SequencedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Sequenced> SequencedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从任意顺序的元素构建
    ///
    /// 按已有序号稳定排序（无序号的元素保持原位置），然后重新编号。
    pub fn from_vec(mut items: Vec<T>) -> Self {
        if items.iter().all(|item| item.sequence().is_some()) {
            items.sort_by_key(|item| item.sequence());
        }
        let mut list = Self { items };
        list.renumber_from(0);
        list
    }

    /// 在 `index` 处插入，`index` 及之后的元素右移
    ///
    /// `index > len` 时返回 `Err(item)`，列表不变
    pub fn insert_at(&mut self, index: usize, item: T) -> Result<(), T> {
        if index > self.items.len() {
            return Err(item);
        }
        self.items.insert(index, item);
        self.renumber_from(index);
        Ok(())
    }

    /// 移除 `index` 处的元素，之后的元素左移并重新编号
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.renumber_from(index);
        Some(removed)
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.renumber_from(self.items.len() - 1);
    }

    fn renumber_from(&mut self, start: usize) {
        for (offset, item) in self.items.iter_mut().enumerate().skip(start) {
            item.set_sequence(offset as u32 + 1);
        }
    }
}

impl<T> SequencedList<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// 可变访问只暴露元素内容，序号由列表维护
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Sequenced> From<Vec<T>> for SequencedList<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<'a, T> IntoIterator for &'a SequencedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Serialize> Serialize for SequencedList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de> + Sequenced> Deserialize<'de> for SequencedList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::from_vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        name: &'static str,
        seq: u32,
    }

    impl Sequenced for Item {
        fn sequence(&self) -> Option<u32> {
            Some(self.seq)
        }

        fn set_sequence(&mut self, sequence: u32) {
            self.seq = sequence;
        }
    }

    fn item(name: &'static str) -> Item {
        Item { name, seq: 0 }
    }

    fn sequences(list: &SequencedList<Item>) -> Vec<u32> {
        list.iter().map(|i| i.seq).collect()
    }

    fn names(list: &SequencedList<Item>) -> Vec<&'static str> {
        list.iter().map(|i| i.name).collect()
    }

    #[test]
    fn test_insert_shifts_and_renumbers() {
        let mut list = SequencedList::new();
        list.push(item("a"));
        list.push(item("c"));
        list.insert_at(1, item("b")).unwrap();
        list.insert_at(0, item("start")).unwrap();
        list.insert_at(4, item("end")).unwrap();

        assert_eq!(names(&list), vec!["start", "a", "b", "c", "end"]);
        assert_eq!(sequences(&list), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_insert_out_of_bounds_is_rejected() {
        let mut list: SequencedList<Item> = SequencedList::new();
        let rejected = list.insert_at(1, item("x")).unwrap_err();
        assert_eq!(rejected.name, "x");
        assert!(list.is_empty());
    }

    #[test]
    fn test_remove_renumbers_tail() {
        let mut list = SequencedList::from_vec(vec![item("a"), item("b"), item("c"), item("d")]);
        let removed = list.remove_at(1).unwrap();
        assert_eq!(removed.name, "b");
        assert_eq!(names(&list), vec!["a", "c", "d"]);
        assert_eq!(sequences(&list), vec![1, 2, 3]);
        assert!(list.remove_at(3).is_none());
    }

    #[test]
    fn test_from_vec_sorts_and_closes_gaps() {
        let list = SequencedList::from_vec(vec![
            Item { name: "third", seq: 9 },
            Item { name: "first", seq: 1 },
            Item { name: "second", seq: 4 },
        ]);
        assert_eq!(names(&list), vec!["first", "second", "third"]);
        assert_eq!(sequences(&list), vec![1, 2, 3]);
    }

    #[test]
    fn test_mixed_operations_keep_contiguous_numbering() {
        let mut list = SequencedList::new();
        // 伪随机但确定的操作序列
        let mut state: u32 = 17;
        for step in 0..200 {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let len = list.len();
            if len == 0 || state % 3 != 0 {
                let index = (state as usize / 7) % (len + 1);
                list.insert_at(index, item("n")).unwrap();
            } else {
                let index = (state as usize / 7) % len;
                list.remove_at(index).unwrap();
            }
            let expected: Vec<u32> = (1..=list.len() as u32).collect();
            assert_eq!(sequences(&list), expected, "step {}", step);
        }
    }
}
