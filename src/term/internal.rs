use crate::annotations::{GeneId, Genes};
use crate::term::{InformationContent, Namespace, TermChildren, TermId, TermIdx, TermParents};
use crate::{DEFAULT_NUM_ALL_PARENTS, DEFAULT_NUM_GENES, DEFAULT_NUM_PARENTS};

#[derive(Debug, Clone)]
pub(crate) struct TermInternal {
    idx: TermIdx,
    id: TermId,
    namespace: Namespace,
    parents: TermParents,
    all_parents: TermParents,
    children: TermChildren,
    genes: Genes,
    ic: InformationContent,
}

impl TermInternal {
    pub fn new(idx: TermIdx, id: TermId, namespace: Namespace) -> TermInternal {
        TermInternal {
            idx,
            id,
            namespace,
            parents: TermParents::with_capacity(DEFAULT_NUM_PARENTS),
            all_parents: TermParents::with_capacity(DEFAULT_NUM_ALL_PARENTS),
            children: TermChildren::with_capacity(DEFAULT_NUM_PARENTS),
            genes: Genes::with_capacity(DEFAULT_NUM_GENES),
            ic: InformationContent::default(),
        }
    }

    pub fn idx(&self) -> TermIdx {
        self.idx
    }

    pub fn id(&self) -> &TermId {
        &self.id
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn parents(&self) -> &TermParents {
        &self.parents
    }

    pub fn children(&self) -> &TermChildren {
        &self.children
    }

    pub fn all_parents(&self) -> &TermParents {
        &self.all_parents
    }

    pub fn all_parents_mut(&mut self) -> &mut TermParents {
        &mut self.all_parents
    }

    pub fn genes(&self) -> &Genes {
        &self.genes
    }

    pub fn genes_mut(&mut self) -> &mut Genes {
        &mut self.genes
    }

    pub fn add_parent(&mut self, parent: TermIdx) -> bool {
        self.parents.insert(parent)
    }

    pub fn add_child(&mut self, child: TermIdx) -> bool {
        self.children.insert(child)
    }

    pub fn add_gene(&mut self, gene_id: GeneId) -> bool {
        self.genes.insert(gene_id)
    }

    pub fn information_content(&self) -> &InformationContent {
        &self.ic
    }

    pub fn information_content_mut(&mut self) -> &mut InformationContent {
        &mut self.ic
    }
}

impl PartialEq for TermInternal {
    fn eq(&self, other: &Self) -> bool {
        self.idx == other.idx
    }
}

impl Eq for TermInternal {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_term_is_unconnected() {
        let id = TermId::try_from("HP:0000118").unwrap();
        let mut term = TermInternal::new(3u32.into(), id, Namespace::Phenotype);
        assert!(term.parents().is_empty());
        assert!(term.all_parents().is_empty());
        assert!(term.genes().is_empty());

        assert!(term.add_parent(1u32.into()));
        assert!(!term.add_parent(1u32.into()));
        assert!(term.add_gene(7u32.into()));
        assert_eq!(term.parents().len(), 1);
        assert_eq!(term.genes().len(), 1);
        assert_eq!(term.namespace(), Namespace::Phenotype);
    }
}
