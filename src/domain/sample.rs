//! Bundled sample hierarchy.
//!
//! Rows are deliberately out of id order to show canonical sorting on import.

pub const SAMPLE_CSV: &str = "id,code,description,type,quantity,unit,parentId
1,PLANT-A,Manufacturing Plant A,location,,,
15,LINE-02,Production Line 2,location,,,1
2,LINE-01,Production Line 1,location,,,1
105,CONV-002,Second Conveyor System,equipment,1,EA,2
3,CONV-001,First Conveyor System,equipment,1,EA,2
102,CONV-001-ASM03,Control Assembly,assembly,1,EA,3
4,CONV-001-ASM01,Drive Assembly,assembly,1,EA,3
7,CONV-001-ASM02,Belt Assembly,assembly,1,EA,3
6,COUP-FLEX-001,Flexible Coupling,part,1,EA,4
5,MOT-5HP-001,\"Motor, 5HP Electric\",part,1,EA,4
9,TENS-001,Belt Tensioner,part,2,EA,7
8,BELT-1200,Conveyor Belt 1200mm,part,1,EA,7
10,PKG-001,Packaging Machine,equipment,1,EA,2
11,PKG-001-ASM01,Sealing Unit Assembly,assembly,1,EA,10
13,TEMP-001,Temperature Sensor,part,1,EA,11
12,HEAT-001,Heating Element,part,2,EA,11
";
