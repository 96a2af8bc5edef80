// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Byte trie mapping raw member-name bytes to values.
//!
//! Built once per object converter from the known wire names and never
//! mutated afterwards. Lookups walk one node per input byte and compare
//! nothing but bytes, so property names read from the document can be
//! dispatched without decoding them into strings.

struct Node {
    /// Children sorted by byte.
    edges: Vec<(u8, u32)>,
    value: Option<u32>,
}

impl Node {
    fn new() -> Node {
        Node {
            edges: Vec::new(),
            value: None,
        }
    }

    #[inline(always)]
    fn child(&self, byte: u8) -> Option<u32> {
        if self.edges.len() <= 8 {
            self.edges
                .iter()
                .find(|(b, _)| *b == byte)
                .map(|&(_, next)| next)
        } else {
            self.edges
                .binary_search_by_key(&byte, |&(b, _)| b)
                .ok()
                .map(|i| self.edges[i].1)
        }
    }
}

pub struct ByteTrie<V> {
    nodes: Vec<Node>,
    values: Vec<V>,
}

impl<V> Default for ByteTrie<V> {
    fn default() -> Self {
        ByteTrie::new()
    }
}

impl<V> ByteTrie<V> {
    pub fn new() -> ByteTrie<V> {
        ByteTrie {
            nodes: vec![Node::new()],
            values: Vec::new(),
        }
    }

    /// Inserts `key`. Returns the value back when the key is already present.
    pub fn insert(&mut self, key: &[u8], value: V) -> Result<(), V> {
        let mut current = 0usize;
        for &byte in key {
            current = match self.nodes[current].child(byte) {
                Some(next) => next as usize,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::new());
                    let edges = &mut self.nodes[current].edges;
                    let at = edges.partition_point(|&(b, _)| b < byte);
                    edges.insert(at, (byte, next as u32));
                    next
                }
            };
        }
        if self.nodes[current].value.is_some() {
            return Err(value);
        }
        self.nodes[current].value = Some(self.values.len() as u32);
        self.values.push(value);
        Ok(())
    }

    #[inline]
    pub fn get(&self, key: &[u8]) -> Option<&V> {
        let mut current = 0usize;
        for &byte in key {
            current = self.nodes[current].child(byte)? as usize;
        }
        self.nodes[current]
            .value
            .map(|index| &self.values[index as usize])
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
