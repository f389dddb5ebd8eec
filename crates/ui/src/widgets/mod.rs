pub mod map;
pub mod track_list;
